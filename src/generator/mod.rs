//! Model-backed pattern generation.
//!
//! [`AiPatternGenerator`] prompts a [`TextGenerator`] for a JSON pattern,
//! cuts the first `{ ... }` span out of whatever prose the model wraps
//! around it, and runs every field through the validator. The generator is
//! stateless; the text backend is an explicit dependency so tests can swap
//! in a scripted one.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{PatternError, Result};
use crate::pattern::{
    AI_DEFAULT_PATTERN, Behavior, COHESION_RANGE, CURVE_RANGE, FieldRange, MovementPattern,
    Provenance, ResolutionResult, SEPARATION_RANGE, SPEED_RANGE,
};
use crate::validator::{coerce_in, parse_number, validate_behavior};

pub use gemini::GeminiClient;

/// A service that turns a prompt into free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short backend name for logs (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Generates a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::ExternalService`] when the backend call fails.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Builds movement patterns by asking a [`TextGenerator`].
#[derive(Clone)]
pub struct AiPatternGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for AiPatternGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiPatternGenerator")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl AiPatternGenerator {
    /// Wraps a text backend.
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Asks the model for a pattern describing `emotion`.
    ///
    /// # Errors
    ///
    /// - [`PatternError::ExternalService`] if the backend call fails.
    /// - [`PatternError::MalformedResponse`] if the reply holds no JSON object.
    pub async fn generate(&self, emotion: &str) -> Result<ResolutionResult> {
        let prompt = build_prompt(emotion);
        let response = self.backend.generate(&prompt).await?;
        debug!(backend = self.backend.name(), response = %response, "model response");

        let object = parse_response_object(&response)?;
        Ok(pattern_from_json(&object, emotion))
    }
}

/// Builds the instruction prompt for `emotion`.
pub fn build_prompt(emotion: &str) -> String {
    let behaviors = Behavior::ALL
        .iter()
        .map(|b| format!("- \"{}\" - {}", b.as_str(), b.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze this emotion/feeling: "{emotion}"

Based on this emotion, create movement parameters for animated dots/particles that would visually represent this feeling.

Consider:
- How fast should dots move? (speed: {speed_min} to {speed_max})
- How much should they cluster together? (cohesion: {coh_min} to {coh_max})
- How much should they avoid each other? (separation: {sep_min} to {sep_max})
- How much random/organic movement? (curve: {curve_min} to {curve_max})

Also suggest which behavior mode best fits:
{behaviors}

Respond ONLY with valid JSON in this exact format:
{{
    "speed": 1.2,
    "cohesion": 0.15,
    "separation": 25,
    "curve": 0.4,
    "behavior": "standard",
    "interpretation": "brief description of how this represents the emotion"
}}"#,
        speed_min = SPEED_RANGE.min,
        speed_max = SPEED_RANGE.max,
        coh_min = COHESION_RANGE.min,
        coh_max = COHESION_RANGE.max,
        sep_min = SEPARATION_RANGE.min,
        sep_max = SEPARATION_RANGE.max,
        curve_min = CURVE_RANGE.min,
        curve_max = CURVE_RANGE.max,
    )
}

/// Returns the span from the first `{` to the last `}` inclusive.
///
/// # Errors
///
/// Returns [`PatternError::MalformedResponse`] if either brace is missing or
/// the closing brace comes first.
pub fn extract_json_object(text: &str) -> Result<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(PatternError::MalformedResponse(
            "no JSON object found in model response".into(),
        )),
    }
}

/// Extracts and parses the JSON object embedded in a model reply.
///
/// # Errors
///
/// Returns [`PatternError::MalformedResponse`] if no object can be parsed.
pub fn parse_response_object(text: &str) -> Result<Map<String, Value>> {
    let slice = extract_json_object(text)?;
    match serde_json::from_str::<Value>(slice) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PatternError::MalformedResponse(format!(
            "expected JSON object, got {other}"
        ))),
        Err(e) => Err(PatternError::MalformedResponse(format!(
            "invalid JSON in model response: {e}"
        ))),
    }
}

/// Builds a validated result from a parsed model object.
pub fn pattern_from_json(object: &Map<String, Value>, emotion: &str) -> ResolutionResult {
    let field = |name: &str, default: f64, range: FieldRange| {
        let raw = object.get(name);
        if raw.is_some() {
            match parse_number(raw) {
                None => warn!(field = name, raw = ?raw, default, "unusable value, using default"),
                Some(n) if !range.contains(n) => {
                    warn!(field = name, value = n, min = range.min, max = range.max, "value clamped")
                }
                Some(_) => {}
            }
        }
        coerce_in(raw, default, range)
    };

    let pattern = MovementPattern {
        speed: field("speed", AI_DEFAULT_PATTERN.speed, SPEED_RANGE),
        cohesion: field("cohesion", AI_DEFAULT_PATTERN.cohesion, COHESION_RANGE),
        separation: field("separation", AI_DEFAULT_PATTERN.separation, SEPARATION_RANGE),
        curve: field("curve", AI_DEFAULT_PATTERN.curve, CURVE_RANGE),
        behavior: validate_behavior(object.get("behavior")),
    };

    if let Some(raw) = object.get("behavior")
        && raw.as_str().and_then(Behavior::from_label).is_none()
    {
        warn!(raw = %raw, "unknown behavior, using standard");
    }

    let interpretation = object
        .get("interpretation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("AI interpretation of \"{emotion}\""));

    ResolutionResult {
        pattern,
        interpretation,
        provenance: Provenance::Ai,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    struct Scripted(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.0
                .map(str::to_owned)
                .map_err(|e| PatternError::ExternalService(e.to_owned()))
        }
    }

    fn generator(reply: std::result::Result<&'static str, &'static str>) -> AiPatternGenerator {
        AiPatternGenerator::new(Arc::new(Scripted(reply)))
    }

    #[test]
    fn prompt_mentions_emotion_ranges_and_behaviors() {
        let prompt = build_prompt("bittersweet nostalgia");
        assert!(prompt.contains("\"bittersweet nostalgia\""));
        assert!(prompt.contains("speed: 0.2 to 2"));
        assert!(prompt.contains("cohesion: 0 to 0.3"));
        assert!(prompt.contains("separation: 10 to 60"));
        assert!(prompt.contains("curve: 0 to 1"));
        for behavior in Behavior::ALL {
            assert!(prompt.contains(&format!("\"{behavior}\"")));
        }
        assert!(prompt.contains("\"interpretation\""));
        assert!(prompt.contains("Respond ONLY with valid JSON"));
    }

    #[test]
    fn extract_strips_surrounding_prose() {
        let text = "Sure! Here you go:\n```json\n{\"speed\": 1.2}\n```\nEnjoy.";
        assert_eq!(extract_json_object(text).unwrap(), "{\"speed\": 1.2}");
    }

    #[test]
    fn extract_spans_first_open_to_last_close() {
        let text = "{\"a\": {\"b\": 1}} trailing }";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": {\"b\": 1}} trailing }");
    }

    #[test]
    fn extract_rejects_missing_or_reversed_braces() {
        for text in ["no json here", "{ unterminated", "only close }", "} backwards {"] {
            let err = extract_json_object(text).unwrap_err();
            assert_eq!(err.code(), "MALFORMED_RESPONSE", "{text}");
        }
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = parse_response_object("{speed: fast}").unwrap_err();
        assert!(matches!(err, PatternError::MalformedResponse(_)));
    }

    #[test]
    fn out_of_range_and_unknown_values_are_corrected() {
        let object = json!({"speed": 99, "behavior": "unknown"});
        let result = pattern_from_json(object.as_object().unwrap(), "storm");
        assert_eq!(result.pattern.speed, 2.0);
        assert_eq!(result.pattern.behavior, Behavior::Standard);
        assert_eq!(result.pattern.cohesion, 0.12);
        assert_eq!(result.pattern.separation, 25.0);
        assert_eq!(result.pattern.curve, 0.3);
        assert_eq!(result.interpretation, "AI interpretation of \"storm\"");
        assert_eq!(result.provenance, Provenance::Ai);
    }

    #[test]
    fn full_object_is_taken_verbatim() {
        let object = json!({
            "speed": 1.2,
            "cohesion": "0.15",
            "separation": 30,
            "curve": 0.4,
            "behavior": "spiral",
            "interpretation": "  Drifting in slow loops  "
        });
        let result = pattern_from_json(object.as_object().unwrap(), "dreamy");
        assert_eq!(result.pattern.speed, 1.2);
        assert_eq!(result.pattern.cohesion, 0.15);
        assert_eq!(result.pattern.separation, 30.0);
        assert_eq!(result.pattern.curve, 0.4);
        assert_eq!(result.pattern.behavior, Behavior::Spiral);
        assert_eq!(result.interpretation, "Drifting in slow loops");
    }

    #[test]
    fn empty_object_uses_ai_defaults() {
        let result = pattern_from_json(&Map::new(), "meh");
        assert_eq!(result.pattern, AI_DEFAULT_PATTERN);
    }

    #[test]
    fn blank_interpretation_uses_template() {
        let object = json!({"interpretation": "   "});
        let result = pattern_from_json(object.as_object().unwrap(), "meh");
        assert_eq!(result.interpretation, "AI interpretation of \"meh\"");
    }

    #[tokio::test]
    async fn generate_parses_wrapped_reply() {
        let ai = generator(Ok(
            "Here is the pattern:\n{\"speed\": 0.5, \"behavior\": \"swarm\", \"interpretation\": \"Slow drift\"}",
        ));
        let result = ai.generate("sleepy").await.unwrap();
        assert_eq!(result.pattern.speed, 0.5);
        assert_eq!(result.pattern.behavior, Behavior::Swarm);
        assert_eq!(result.interpretation, "Slow drift");
    }

    #[tokio::test]
    async fn generate_surfaces_backend_failure() {
        let err = generator(Err("quota exceeded")).generate("x").await.unwrap_err();
        assert!(matches!(err, PatternError::ExternalService(_)));
    }

    #[tokio::test]
    async fn generate_rejects_garbage() {
        let err = generator(Ok("I feel that too!")).generate("x").await.unwrap_err();
        assert!(matches!(err, PatternError::MalformedResponse(_)));
    }

    #[test]
    fn debug_shows_backend_name() {
        let ai = generator(Ok("{}"));
        assert!(format!("{ai:?}").contains("scripted"));
        assert_eq!(ai.backend_name(), "scripted");
    }
}
