//! Emotion-to-pattern resolution.
//!
//! [`PatternResolver`] is the single entry point used by the HTTP layer. It
//! asks the model first when one is configured and answers from the keyword
//! classifier otherwise, or whenever the model path fails. Only empty input
//! is ever reported as an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::classifier;
use crate::config::GeminiConfig;
use crate::error::{PatternError, Result};
use crate::generator::{AiPatternGenerator, GeminiClient, TextGenerator};
use crate::pattern::ResolutionResult;

/// Default bound on one model call.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolves emotion text into validated movement patterns.
#[derive(Debug, Clone)]
pub struct PatternResolver {
    generator: Option<AiPatternGenerator>,
    timeout: Duration,
}

impl Default for PatternResolver {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl PatternResolver {
    /// Resolver that never calls a model.
    pub fn rule_based() -> Self {
        Self {
            generator: None,
            timeout: DEFAULT_AI_TIMEOUT,
        }
    }

    /// Resolver backed by `backend`, with the keyword classifier as fallback.
    pub fn with_generator(backend: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(AiPatternGenerator::new(backend)),
            timeout: DEFAULT_AI_TIMEOUT,
        }
    }

    /// Builds a resolver from Gemini settings.
    ///
    /// Without an API key, or when the client cannot be built, the resolver
    /// runs rule-based only and a warning is logged.
    pub fn from_gemini_config(config: &GeminiConfig) -> Self {
        if !config.is_configured() {
            warn!("no GEMINI_API_KEY configured; using keyword classifier only");
            return Self::rule_based();
        }
        match GeminiClient::new(config.clone()) {
            Ok(client) => {
                info!(model = %config.model, "Gemini text generation enabled");
                Self::with_generator(Arc::new(client)).with_timeout(config.timeout())
            }
            Err(e) => {
                warn!(error = %e, "Gemini setup failed; using keyword classifier only");
                Self::rule_based()
            }
        }
    }

    /// Overrides the bound on one model call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true if a model backend is configured.
    pub fn is_ai_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Resolves `emotion` into a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidInput`] if `emotion` is blank. Model
    /// failures are never returned; they fall back to the classifier.
    pub async fn resolve(&self, emotion: &str) -> Result<ResolutionResult> {
        let emotion = emotion.trim();
        if emotion.is_empty() {
            return Err(PatternError::InvalidInput(
                "Please provide emotion text".into(),
            ));
        }
        debug!(emotion, "resolving emotion");

        let mut result = match &self.generator {
            Some(generator) => match self.generate_bounded(generator, emotion).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        backend = generator.backend_name(),
                        code = e.code(),
                        error = %e,
                        "AI generation failed, using keyword fallback"
                    );
                    classifier::classify(emotion)
                }
            },
            None => classifier::classify(emotion),
        };

        result.pattern = result.pattern.clamped();
        info!(
            provenance = ?result.provenance,
            behavior = %result.pattern.behavior,
            interpretation = %result.interpretation,
            "pattern resolved"
        );
        Ok(result)
    }

    async fn generate_bounded(
        &self,
        generator: &AiPatternGenerator,
        emotion: &str,
    ) -> Result<ResolutionResult> {
        match tokio::time::timeout(self.timeout, generator.generate(emotion)).await {
            Ok(result) => result,
            Err(_) => Err(PatternError::ExternalService(format!(
                "model call exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
