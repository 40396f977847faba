use crate::evaluator::Evaluator;
use crate::extractor::extract_document_text;
use crate::interpreter::interpret;
use crate::models::{
    EvaluationResult, ScreeningReport, SkippedResume, UploadReport, UploadedDocument,
};
use crate::prompt::build_prompt;
use crate::store::{InsertOutcome, ResumeStore};
use crate::ScreeningError;
use tracing::{info, warn};

/// Runs documents through extract → prompt → evaluate → interpret, one at a
/// time. A failing document is reported and the batch carries on.
pub struct Screener<E>
where
    E: Evaluator,
{
    evaluator: E,
}

impl<E> Screener<E>
where
    E: Evaluator + Send + Sync,
{
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    async fn assess(
        &self,
        job_description: &str,
        name: &str,
        resume_text: &str,
        content: Vec<u8>,
    ) -> Result<EvaluationResult, String> {
        let prompt = build_prompt(job_description, resume_text);
        let output = self
            .evaluator
            .evaluate(&prompt)
            .await
            .map_err(|error| error.to_string())?;
        let assessment = interpret(&output);

        info!(
            resume = name,
            match_percentage = assessment.match_percentage,
            suitability = %assessment.suitability,
            "resume evaluated"
        );

        Ok(EvaluationResult {
            resume_name: name.to_string(),
            match_percentage: assessment.match_percentage,
            suitability: assessment.suitability,
            content,
        })
    }

    /// Screens freshly uploaded documents and stores every one that was evaluated.
    ///
    /// A storage failure aborts the batch with [`ScreeningError::Store`]; the
    /// partial report is discarded, and resumes stored before the failure stay
    /// stored.
    pub async fn screen_uploads(
        &self,
        job_description: &str,
        documents: &[UploadedDocument],
        store: &ResumeStore,
    ) -> Result<ScreeningReport, ScreeningError> {
        ensure_job_description(job_description)?;

        let mut report = ScreeningReport::default();
        for document in documents {
            let text = match extract_document_text(&document.media_type, &document.content) {
                Ok(text) => text,
                Err(error) => {
                    skip(&mut report.skipped, &document.name, error.to_string());
                    continue;
                }
            };

            match self
                .assess(job_description, &document.name, &text, document.content.clone())
                .await
            {
                Ok(result) => {
                    store.insert(&document.name, &text, &document.content).await?;
                    report.results.push(result);
                }
                Err(reason) => skip(&mut report.skipped, &document.name, reason),
            }
        }

        info!(
            evaluated = report.results.len(),
            skipped = report.skipped.len(),
            "screening finished"
        );
        Ok(report)
    }

    /// Re-evaluates the latest version of every stored resume against a new job description.
    pub async fn rematch_corpus(
        &self,
        job_description: &str,
        store: &ResumeStore,
    ) -> Result<ScreeningReport, ScreeningError> {
        ensure_job_description(job_description)?;

        let mut report = ScreeningReport::default();
        for name in store.distinct_names().await? {
            let Some(record) = store.latest(&name).await? else {
                continue;
            };

            match self
                .assess(job_description, &record.name, &record.text, record.content)
                .await
            {
                Ok(result) => report.results.push(result),
                Err(reason) => skip(&mut report.skipped, &name, reason),
            }
        }

        info!(
            evaluated = report.results.len(),
            skipped = report.skipped.len(),
            "corpus re-evaluation finished"
        );
        Ok(report)
    }
}

/// Extracts and stores documents, skipping any whose name and text are already stored.
pub async fn upload_to_store(
    documents: &[UploadedDocument],
    store: &ResumeStore,
) -> Result<UploadReport, ScreeningError> {
    let mut report = UploadReport::default();

    for document in documents {
        let text = match extract_document_text(&document.media_type, &document.content) {
            Ok(text) => text,
            Err(error) => {
                skip(&mut report.skipped, &document.name, error.to_string());
                continue;
            }
        };

        match store
            .insert_if_absent(&document.name, &text, &document.content)
            .await?
        {
            InsertOutcome::Inserted(id) => {
                info!(resume = %document.name, id, "uploaded resume");
                report.uploaded.push(document.name.clone());
            }
            InsertOutcome::SkippedIdentical => {
                warn!(resume = %document.name, "identical resume already stored, skipping upload");
                report.duplicates.push(document.name.clone());
            }
        }
    }

    Ok(report)
}

fn ensure_job_description(job_description: &str) -> Result<(), ScreeningError> {
    if job_description.trim().is_empty() {
        return Err(ScreeningError::EmptyJobDescription);
    }
    Ok(())
}

fn skip(skipped: &mut Vec<SkippedResume>, name: &str, reason: String) {
    warn!(resume = name, reason = %reason, "skipped resume");
    skipped.push(SkippedResume {
        name: name.to_string(),
        reason,
    });
}
