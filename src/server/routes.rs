//! Axum route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error};

use super::AppState;
use super::models::{EmotionRequest, ErrorResponse, HealthResponse, PatternResponse};
use crate::error::PatternError;

/// Message returned for a missing or blank `emotion` field.
const MISSING_EMOTION: &str = "Please provide emotion text";

/// Error wrapper that renders as a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub PatternError);

impl From<PatternError> for ApiError {
    fn from(e: PatternError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PatternError::InvalidInput(_) => (StatusCode::BAD_REQUEST, MISSING_EMOTION.to_owned()),
            other => {
                error!(error = %other, "unrecovered error generating pattern");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate pattern: {other}"),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// `GET /health`: reports whether the model backend is configured.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ai_model = if state.resolver.is_ai_configured() {
        "connected"
    } else {
        "disconnected"
    };
    Json(HealthResponse {
        status: "healthy".to_owned(),
        ai_model: ai_model.to_owned(),
        message: "Emotion Pattern API is running!".to_owned(),
    })
}

/// `POST /generate-emotion-pattern`: resolve emotion text into a pattern.
///
/// # Errors
///
/// - 400: body is not JSON, `emotion` is missing, not a string, or blank.
/// - 500: any other failure (the resolver recovers model errors itself).
pub async fn generate_pattern(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EmotionRequest>, JsonRejection>,
) -> Result<Json<PatternResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "rejected request body");
            return Err(PatternError::InvalidInput(rejection.body_text()).into());
        }
    };

    let emotion = request.emotion.unwrap_or_default();
    let emotion = emotion.trim();
    let result = state.resolver.resolve(emotion).await?;
    Ok(Json(PatternResponse::new(emotion, result)))
}

/// `GET /`: API documentation.
pub async fn docs() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Emotion Pattern API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/generate-emotion-pattern": "POST - Generate dot patterns from emotions",
            "/health": "GET - Check API health"
        },
        "example_request": {
            "url": "/generate-emotion-pattern",
            "method": "POST",
            "body": {"emotion": "overwhelming joy mixed with nostalgia"},
            "response": {
                "success": true,
                "emotion": "overwhelming joy mixed with nostalgia",
                "pattern": {
                    "speed": 1.3,
                    "cohesion": 0.18,
                    "separation": 25,
                    "curve": 0.5,
                    "behavior": "swarm"
                },
                "interpretation": "Joyful, bouncy, grouped movement",
                "ai_used": false
            }
        }
    }))
}
