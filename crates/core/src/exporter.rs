use crate::error::ExportError;
use crate::models::{NamedContent, ResumeListing};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SUITABLE_ARCHIVE_NAME: &str = "Suitable_Resumes.zip";
pub const UNSUITABLE_ARCHIVE_NAME: &str = "Unsuitable_Resumes.zip";
pub const LISTING_ARCHIVE_NAME: &str = "Database_Resumes.zip";

/// Packs `(name, bytes)` pairs into one zip buffer, one entry per distinct
/// name. A repeated name keeps its first position and its last content.
pub fn build_archive(files: &[NamedContent]) -> Result<Vec<u8>, ExportError> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(&str, &[u8])> = Vec::new();

    for (name, content) in files {
        match positions.get(name.as_str()) {
            Some(&position) => entries[position].1 = content.as_slice(),
            None => {
                positions.insert(name.as_str(), entries.len());
                entries.push((name.as_str(), content.as_slice()));
            }
        }
    }

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in entries {
        writer.start_file(name, options)?;
        writer.write_all(content)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Snapshot of stored names. Each entry carries the resume name as its
/// content, not the stored document bytes.
// TODO: confirm whether the listing should carry stored bytes; it mirrors the
// legacy "Download Database List" output until that is decided.
pub fn build_listing_archive(listings: &[ResumeListing]) -> Result<Vec<u8>, ExportError> {
    let files: Vec<NamedContent> = listings
        .iter()
        .map(|listing| (listing.name.clone(), listing.name.as_bytes().to_vec()))
        .collect();

    build_archive(&files)
}
