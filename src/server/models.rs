//! JSON request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::pattern::{MovementPattern, ResolutionResult};

/// Request body for `POST /generate-emotion-pattern`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionRequest {
    /// Free-text emotion description.
    #[serde(default)]
    pub emotion: Option<String>,
}

/// Successful response body for `POST /generate-emotion-pattern`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternResponse {
    /// Always `true`.
    pub success: bool,
    /// The trimmed emotion text that was resolved.
    pub emotion: String,
    /// Validated movement parameters.
    pub pattern: MovementPattern,
    /// Natural-language description of the pattern.
    pub interpretation: String,
    /// Whether the model (rather than the keyword classifier) produced it.
    pub ai_used: bool,
}

impl PatternResponse {
    /// Builds a response from a resolution result.
    pub fn new(emotion: impl Into<String>, result: ResolutionResult) -> Self {
        Self {
            success: true,
            emotion: emotion.into(),
            ai_used: result.ai_used(),
            pattern: result.pattern,
            interpretation: result.interpretation,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,
    /// `"connected"` when a model backend is configured, else `"disconnected"`.
    pub ai_model: String,
    /// Greeting.
    pub message: String,
}
