//! AI sub-task suggestions through the Gemini `generateContent` API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("API Key is not set. Please configure it in the settings.")]
    MissingCredential,

    #[error("The provided API Key is invalid. Please check it in the settings.")]
    InvalidCredential,

    #[error("Failed to get AI suggestions. Please try again later.")]
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 20,
        }
    }
}

#[async_trait]
pub trait SubtaskSuggester: Send + Sync {
    /// Short, actionable sub-tasks for a task title.
    async fn suggest_subtasks(&self, task_title: &str) -> Result<Vec<String>, SuggestionError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Subtasks {
    #[serde(default)]
    subtasks: Option<Vec<String>>,
}

fn prompt_for(task_title: &str) -> String {
    format!(
        "Break down the task \"{}\" into a list of smaller, actionable sub-tasks. \
         The user is a busy professional balancing work and home life.",
        task_title
    )
}

fn request_body(task_title: &str) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt_for(task_title) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "subtasks": {
                        "type": "ARRAY",
                        "items": {
                            "type": "STRING",
                            "description": "A single, actionable sub-task."
                        }
                    }
                }
            }
        }
    })
}

/// Maps an unsuccessful response to one of the user-facing error kinds.
fn classify_failure(status: StatusCode, body: &str) -> SuggestionError {
    if body.contains("API key not valid")
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        SuggestionError::InvalidCredential
    } else {
        SuggestionError::Failed(format!("{}: {}", status, body))
    }
}

/// Extracts the sub-task list from a `generateContent` response body.
fn parse_subtasks(body: &str) -> Result<Vec<String>, SuggestionError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| SuggestionError::Failed(e.to_string()))?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text);

    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return Ok(Vec::new());
    };
    let parsed: Subtasks =
        serde_json::from_str(&text).map_err(|e| SuggestionError::Failed(e.to_string()))?;
    Ok(parsed.subtasks.unwrap_or_default())
}

pub struct GeminiSuggester {
    client: reqwest::Client,
    config: SuggestionConfig,
}

impl GeminiSuggester {
    pub fn new(config: SuggestionConfig) -> Result<Self, SuggestionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SuggestionError::Failed(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl SubtaskSuggester for GeminiSuggester {
    async fn suggest_subtasks(&self, task_title: &str) -> Result<Vec<String>, SuggestionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SuggestionError::MissingCredential)?;

        debug!(model = %self.config.model, "requesting sub-task suggestions");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request_body(task_title))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "suggestion request failed");
                SuggestionError::Failed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SuggestionError::Failed(e.to_string()))?;

        if !status.is_success() {
            let error = classify_failure(status, &body);
            warn!(%status, ?error, "suggestion service returned an error");
            return Err(error);
        }
        parse_subtasks(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str, api_key: Option<&str>) -> SuggestionConfig {
        SuggestionConfig {
            api_key: api_key.map(str::to_string),
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
            ..SuggestionConfig::default()
        }
    }

    fn candidate_with(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[tokio::test]
    async fn test_suggestions_parsed_from_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with(
                r#"{"subtasks": ["Book venue", "Send invites"]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(config(&server.uri(), Some("test-key"))).unwrap();
        let subtasks = suggester.suggest_subtasks("Plan party").await.unwrap();
        assert_eq!(subtasks, vec!["Book venue", "Send invites"]);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(config(&server.uri(), Some("  "))).unwrap();
        assert_eq!(
            suggester.suggest_subtasks("Plan party").await,
            Err(SuggestionError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn test_invalid_key_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(config(&server.uri(), Some("bad"))).unwrap();
        assert_eq!(
            suggester.suggest_subtasks("Plan party").await,
            Err(SuggestionError::InvalidCredential)
        );
    }

    #[tokio::test]
    async fn test_server_error_is_generic_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(config(&server.uri(), Some("key"))).unwrap();
        assert!(matches!(
            suggester.suggest_subtasks("Plan party").await,
            Err(SuggestionError::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_with(r#"{"subtasks": []}"#))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(SuggestionConfig {
            timeout_secs: 1,
            ..config(&server.uri(), Some("key"))
        })
        .unwrap();
        assert!(matches!(
            suggester.suggest_subtasks("Plan party").await,
            Err(SuggestionError::Failed(_))
        ));
    }

    #[test]
    fn test_missing_subtasks_field_is_empty() {
        assert!(parse_subtasks(&candidate_with("{}").to_string()).unwrap().is_empty());
        assert!(parse_subtasks(r#"{"candidates": []}"#).unwrap().is_empty());
        assert!(matches!(
            parse_subtasks(&candidate_with("not json").to_string()),
            Err(SuggestionError::Failed(_))
        ));
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(
            classify_failure(StatusCode::FORBIDDEN, ""),
            SuggestionError::InvalidCredential
        );
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "quota"),
            SuggestionError::Failed(_)
        ));
    }
}
