use crate::models::{MediaType, SkippedResume, UploadedDocument, OCTET_STREAM_MIME};
use crate::IngestError;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn declared_media_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
        .map(|media_type| media_type.as_mime())
        .unwrap_or(OCTET_STREAM_MIME)
}

/// Recursively collects `.pdf` and `.docx` files under `folder`, sorted.
pub fn discover_resume_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_resume = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .is_some();

        if is_resume {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

impl UploadedDocument {
    /// Reads a file and declares its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
            })?;

        let content = fs::read(path)?;
        Ok(Self::new(name, declared_media_type(path), content))
    }
}

pub struct LoadReport {
    pub documents: Vec<UploadedDocument>,
    pub skipped: Vec<SkippedResume>,
}

/// Loads every path it can; unreadable files are reported instead of failing the batch.
pub fn load_documents_best_effort(paths: &[PathBuf]) -> LoadReport {
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        match UploadedDocument::from_path(path) {
            Ok(document) => documents.push(document),
            Err(error) => skipped.push(SkippedResume {
                name: path.display().to_string(),
                reason: error.to_string(),
            }),
        }
    }

    LoadReport { documents, skipped }
}

/// Explicit files first, then everything discovered under `folder`.
pub fn collect_resume_paths(
    files: &[PathBuf],
    folder: Option<&Path>,
) -> Result<Vec<PathBuf>, IngestError> {
    let mut paths = files.to_vec();

    if let Some(folder) = folder {
        let discovered = discover_resume_files(folder);
        if discovered.is_empty() {
            return Err(IngestError::InvalidArgument(format!(
                "no pdf or docx files found in {}",
                folder.display()
            )));
        }
        paths.extend(discovered);
    }

    if paths.is_empty() {
        return Err(IngestError::InvalidArgument(
            "no resume files given".to_string(),
        ));
    }

    Ok(paths)
}
