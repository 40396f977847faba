use crate::error::EvaluationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sends one composed prompt to a text-generation backend and returns its raw answer.
#[async_trait]
pub trait Evaluator {
    async fn evaluate(&self, prompt: &str) -> Result<String, EvaluationError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn generate_url(&self) -> Result<Url, EvaluationError> {
        let base = self.endpoint.trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/models/{}:generateContent",
            self.model
        ))?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, EvaluationError> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(EvaluationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Gemini `generateContent` client. One request per call, no retries.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Evaluator for GeminiClient {
    async fn evaluate(&self, prompt: &str) -> Result<String, EvaluationError> {
        let url = self.config.generate_url()?;
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "sending evaluation request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&payload)
                .map(|envelope| envelope.error.message)
                .unwrap_or(payload);
            return Err(EvaluationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&payload)?;
        let text = parsed.into_text()?;
        debug!(response_chars = text.len(), "evaluation response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_targets_configured_model() {
        let config = GeminiConfig::new("key")
            .with_endpoint("http://localhost:8080/v1beta/")
            .with_model("gemini-1.5-flash");

        let url = config.generate_url().expect("url should be valid");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn default_config_uses_fixed_model() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn invalid_endpoint_is_a_url_error() {
        let config = GeminiConfig::new("key").with_endpoint("not a url");
        assert!(matches!(config.generate_url(), Err(EvaluationError::Url(_))));
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
        };

        let value = serde_json::to_value(&body).expect("request should serialize");
        assert_eq!(
            value,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn response_parts_of_first_candidate_are_joined() {
        let payload = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "JD Match: 80%\n"}, {"text": "Missing Keywords: []"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;

        let parsed: GenerateContentResponse =
            serde_json::from_str(payload).expect("payload should parse");
        let text = parsed.into_text().expect("text should be present");
        assert_eq!(text, "JD Match: 80%\nMissing Keywords: []");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
                .expect("payload should parse");
        assert!(matches!(parsed.into_text(), Err(EvaluationError::EmptyResponse)));
    }
}
