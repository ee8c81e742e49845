/// Analysis client: the single point of entry for all scoring-service calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// The orchestrator depends only on the `AnalysisClient` trait.
///
/// One round trip per call. No retries; a timeout applies only when configured.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::screening::models::{AnalysisResult, EncodedPayload};
use crate::screening::request_builder::AnalysisRequest;
use crate::screening::schema::{SchemaDescriptor, SchemaViolation};

pub mod prompts;

/// A failed analysis call. `Display` yields the raw message the classifier inspects.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    #[error("Response blocked: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl RemoteFailure {
    /// True when the reply could not be understood as the expected JSON document.
    pub fn is_format_failure(&self) -> bool {
        matches!(
            self,
            RemoteFailure::Malformed(_) | RemoteFailure::SchemaViolation(_)
        )
    }
}

/// Boundary to the remote scoring service.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        payload: &EncodedPayload,
    ) -> Result<AnalysisResult, RemoteFailure>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate, or explains why there is none.
    pub fn text(&self) -> Result<&str, RemoteFailure> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(RemoteFailure::Blocked {
                reason: reason.to_string(),
            });
        }

        let candidate = self.candidates.first().ok_or(RemoteFailure::EmptyContent)?;
        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()));

        match (text, candidate.finish_reason.as_deref()) {
            (Some(text), _) => Ok(text),
            (None, Some("SAFETY")) => Err(RemoteFailure::Blocked {
                reason: "SAFETY".to_string(),
            }),
            (None, _) => Err(RemoteFailure::EmptyContent),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with structured JSON output.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.analysis_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.gemini_api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.gemini_api_base.trim_end_matches('/'),
                config.gemini_model
            ),
        })
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        payload: &EncodedPayload,
    ) -> Result<AnalysisResult, RemoteFailure> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: &request.prompt,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &payload.mime_type,
                            data: &payload.content,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.schema.to_response_schema(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the service's own error message when the body carries one
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(RemoteFailure::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let reply: GenerateContentResponse = serde_json::from_str(&raw)?;
        let text = reply.text()?;

        debug!("Analysis call succeeded: {} chars of output", text.len());

        parse_reply(text, &request.schema)
    }
}

/// Decodes the model's text output and validates it against the schema.
pub fn parse_reply(text: &str, schema: &SchemaDescriptor) -> Result<AnalysisResult, RemoteFailure> {
    let value: Value = serde_json::from_str(strip_json_fences(text))?;
    Ok(schema.validate(&value)?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
