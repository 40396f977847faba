use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim() {
            PDF_MIME => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else if extension.eq_ignore_ascii_case("docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }
}

/// A resume as handed over by the caller, before any text has been extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    /// Declared media type; anything other than pdf/docx is rejected per document.
    pub media_type: String,
    pub content: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResumeRecord {
    pub id: i64,
    pub name: String,
    pub text: String,
    pub content: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ResumeListing {
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suitability {
    Suitable,
    NotSuitable,
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suitable => f.write_str("Suitable"),
            Self::NotSuitable => f.write_str("Not Suitable"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchAssessment {
    pub match_percentage: f64,
    pub suitability: Suitability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub resume_name: String,
    pub match_percentage: f64,
    pub suitability: Suitability,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl EvaluationResult {
    /// Inline download handle for the original document bytes.
    pub fn download_link(&self) -> String {
        format!(
            "data:{OCTET_STREAM_MIME};base64,{}",
            STANDARD.encode(&self.content)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedResume {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScreeningReport {
    pub results: Vec<EvaluationResult>,
    pub skipped: Vec<SkippedResume>,
}

pub type NamedContent = (String, Vec<u8>);

impl ScreeningReport {
    /// Splits evaluated resumes into (suitable, not suitable) archive inputs,
    /// keeping evaluation order inside each group.
    pub fn split_by_suitability(&self) -> (Vec<NamedContent>, Vec<NamedContent>) {
        let mut suitable = Vec::new();
        let mut unsuitable = Vec::new();

        for result in &self.results {
            let entry = (result.resume_name.clone(), result.content.clone());
            match result.suitability {
                Suitability::Suitable => suitable.push(entry),
                Suitability::NotSuitable => unsuitable.push(entry),
            }
        }

        (suitable, unsuitable)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub duplicates: Vec<String>,
    pub skipped: Vec<SkippedResume>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, suitability: Suitability) -> EvaluationResult {
        EvaluationResult {
            resume_name: name.to_string(),
            match_percentage: 0.0,
            suitability,
            content: name.as_bytes().to_vec(),
        }
    }

    #[test]
    fn media_type_resolves_declared_mime_types() {
        assert_eq!(MediaType::from_mime(PDF_MIME), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime(DOCX_MIME), Some(MediaType::Docx));
        assert_eq!(MediaType::from_mime("application/msword"), None);
        assert_eq!(MediaType::from_extension("PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension("txt"), None);
    }

    #[test]
    fn suitability_renders_labels() {
        assert_eq!(Suitability::Suitable.to_string(), "Suitable");
        assert_eq!(Suitability::NotSuitable.to_string(), "Not Suitable");
    }

    #[test]
    fn download_link_embeds_base64_content() {
        let link = result("cv.pdf", Suitability::Suitable).download_link();
        assert_eq!(link, "data:application/octet-stream;base64,Y3YucGRm");
    }

    #[test]
    fn split_keeps_order_within_groups() {
        let report = ScreeningReport {
            results: vec![
                result("a.pdf", Suitability::Suitable),
                result("b.pdf", Suitability::NotSuitable),
                result("c.docx", Suitability::Suitable),
            ],
            skipped: Vec::new(),
        };

        let (suitable, unsuitable) = report.split_by_suitability();
        let suitable_names: Vec<_> = suitable.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(suitable_names, vec!["a.pdf", "c.docx"]);
        assert_eq!(unsuitable.len(), 1);
        assert_eq!(unsuitable[0].1, b"b.pdf".to_vec());
    }
}
