//! Minimal blocking client for the Gemini `generateContent` endpoint.
//!
//! Calls run on worker threads (see the app runtime), so the blocking reqwest
//! client is built per request and never touches the UI executor.

use crate::cancellation::CancellationToken;
use crate::config::AppConfig;
use crate::error::PrompterError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    /// Split a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: &'a [Part],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, PrompterError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| env::var(var).ok().filter(|key| !key.trim().is_empty()))
            })
            .ok_or_else(|| {
                PrompterError::Configuration(
                    "no Gemini API key; set resolver.gemini_api_key or GEMINI_API_KEY".to_string(),
                )
            })?;

        Ok(Self {
            api_key,
            model: config.gemini_model.clone(),
            endpoint: config.gemini_endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.resolver_timeout_secs.max(1)),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    /// Send one prompt and return the concatenated text of the first
    /// candidate. `json` asks the model for a JSON response body.
    pub fn generate(
        &self,
        parts: &[Part],
        json: bool,
        cancel: &CancellationToken,
    ) -> Result<String, PrompterError> {
        cancel.check_cancelled("gemini.before_send")?;

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| PrompterError::Inference(format!("HTTP client: {err}")))?;
        let body = GenerateRequest {
            contents: [Content { role: "user", parts }],
            generation_config: json.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        debug!(model = %self.model, parts = parts.len(), "Sending Gemini request");
        let response = http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    PrompterError::Inference(format!(
                        "request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    PrompterError::Inference(err.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| PrompterError::Inference(err.to_string()))?;
        cancel.check_cancelled("gemini.after_response")?;

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|err| PrompterError::Inference(format!("malformed response: {err}")))?;
        let output: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if output.trim().is_empty() {
            return Err(PrompterError::Inference(
                "the model did not produce any output".to_string(),
            ));
        }
        Ok(output)
    }
}

/// Credential problems are configuration errors; everything else is retryable.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> PrompterError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    warn!(%status, "Gemini request failed: {message}");
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || message.contains("API key")
    {
        PrompterError::Configuration(message)
    } else {
        PrompterError::Inference(format!("HTTP {status}: {message}"))
    }
}

/// Strip a Markdown code fence some models wrap JSON in.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
