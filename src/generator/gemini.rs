//! Google Gemini text-generation backend.
//!
//! Speaks the `models/{model}:generateContent` REST endpoint. Every failure,
//! from a refused connection to a safety-blocked reply with no candidates,
//! maps to [`PatternError::ExternalService`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextGenerator;
use crate::config::GeminiConfig;
use crate::error::{PatternError, Result};

// ── Wire types ────────────────────────────────────────────────

/// Request body for `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn here.
    pub contents: Vec<Content>,
    /// Sampling settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Author role (`user` or `model`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text parts of the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Fragment text. Absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates; empty when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A single generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content.
    #[serde(default)]
    pub content: Content,
    /// Why generation stopped (`STOP`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, trimmed.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }
}

/// Build the JSON request body for a single-prompt call.
pub fn build_request(prompt: &str, temperature: f32) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_owned()),
            parts: vec![Part {
                text: Some(prompt.to_owned()),
            }],
        }],
        generation_config: Some(GenerationConfig { temperature }),
    }
}

// ── Client ────────────────────────────────────────────────────

/// Gemini API client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Config`] if no API key is set or the HTTP
    /// client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(PatternError::Config("Gemini API key is not set".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PatternError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Endpoint URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Map an HTTP error status to a service error.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> PatternError {
        let message = extract_error_message(body);
        let kind = match status.as_u16() {
            400 => "bad request",
            401 | 403 => "authentication failed",
            429 => "quota exceeded",
            500..=599 => "server error",
            _ => "request failed",
        };
        PatternError::ExternalService(format!(
            "Gemini {kind} (HTTP {}): {message}",
            status.as_u16()
        ))
    }
}

/// Extract an error message from a Gemini error body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = build_request(prompt, self.config.temperature);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PatternError::ExternalService(format!("Gemini request timed out: {e}"))
                } else {
                    PatternError::ExternalService(format!("Gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            PatternError::ExternalService(format!("Gemini response not decodable: {e}"))
        })?;

        match parsed.text() {
            Some(text) => Ok(text),
            None => {
                let reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_owned());
                debug!(reason = %reason, "Gemini returned no text");
                Err(PatternError::ExternalService(format!(
                    "Gemini returned no text ({reason})"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn configured() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn new_requires_api_key() {
        let err = GeminiClient::new(GeminiConfig::default()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(GeminiConfig {
            base_url: "http://localhost:9999/".to_owned(),
            model: "gemini-pro".to_owned(),
            ..configured()
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(build_request("hello", 0.5)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn response_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":" {\"speed\""},{"text":": 1} "}]},"finishReason":"STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("{\"speed\": 1}"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let json = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.text().is_none());
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn http_errors_map_to_external_service() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted"}}"#;
        let err = GeminiClient::map_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.code(), "EXTERNAL_SERVICE");
        assert!(err.to_string().contains("quota exceeded"));
        assert!(err.to_string().contains("Resource has been exhausted"));

        let err = GeminiClient::map_http_error(reqwest::StatusCode::FORBIDDEN, "denied");
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn debug_omits_api_key() {
        let client = GeminiClient::new(configured()).unwrap();
        assert!(!format!("{client:?}").contains("test-key"));
    }
}
