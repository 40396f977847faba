pub mod error;
pub mod evaluator;
pub mod exporter;
pub mod extractor;
pub mod ingest;
pub mod interpreter;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod store;

pub use error::{EvaluationError, ExportError, IngestError, ScreeningError, StoreError};
pub use evaluator::{Evaluator, GeminiClient, GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use exporter::{
    build_archive, build_listing_archive, LISTING_ARCHIVE_NAME, SUITABLE_ARCHIVE_NAME,
    UNSUITABLE_ARCHIVE_NAME,
};
pub use extractor::{extract_document_text, DocxExtractor, LopdfExtractor, TextExtractor};
pub use ingest::{
    collect_resume_paths, discover_resume_files, load_documents_best_effort, LoadReport,
};
pub use interpreter::{
    classify, interpret, parse_match_percentage, MATCH_MARKER, SUITABILITY_THRESHOLD,
};
pub use models::{
    EvaluationResult, MatchAssessment, MediaType, NamedContent, ResumeListing, ResumeRecord,
    ScreeningReport, SkippedResume, Suitability, UploadReport, UploadedDocument, DOCX_MIME,
    OCTET_STREAM_MIME, PDF_MIME,
};
pub use orchestrator::{upload_to_store, Screener};
pub use prompt::{build_prompt, INSTRUCTION_HEADER};
pub use store::{InsertOutcome, ResumeStore};
