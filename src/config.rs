//! Configuration types for the emotion pattern service.
//!
//! Values come from an optional TOML file, then environment variables
//! override individual fields. A Gemini API key is the only setting most
//! deployments need; without one the service answers from the keyword
//! classifier alone.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PatternError, Result};

/// Environment variable holding the Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Gemini model name.
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
/// Environment variable overriding the bind host.
pub const ENV_HOST: &str = "EMOTION_PATTERN_HOST";
/// Environment variable overriding the bind port.
pub const ENV_PORT: &str = "EMOTION_PATTERN_PORT";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Gemini text-generation settings.
    pub gemini: GeminiConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind (`0` = auto-assign).
    pub port: u16,
    /// Whether to answer cross-origin browser requests.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            cors: true,
        }
    }
}

/// Gemini API configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. Empty means the AI path is disabled.
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API base URL without the version segment.
    pub base_url: String,
    /// Upper bound on one model call, in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_owned(),
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            timeout_secs: 15,
            temperature: 0.7,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiConfig {
    /// Returns true when an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Model call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PatternError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PatternError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/emotion-pattern/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("emotion-pattern")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("emotion-pattern")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/emotion-pattern/config.toml")
        }
    }

    /// Applies environment overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a port override is not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides using `lookup` to read variables.
    ///
    /// Split out from [`apply_env_overrides`](Self::apply_env_overrides) so
    /// tests need not touch the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a port override is not a valid port number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_GEMINI_API_KEY) {
            self.gemini.api_key = key.trim().to_owned();
        }
        if let Some(model) = lookup(ENV_GEMINI_MODEL).filter(|m| !m.trim().is_empty()) {
            self.gemini.model = model.trim().to_owned();
        }
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_owned();
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| PatternError::Config(format!("{ENV_PORT}={port:?}: {e}")))?;
        }
        Ok(())
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(PatternError::Config("server.host must not be empty".into()));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(PatternError::Config(
                "gemini.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(PatternError::Config("gemini.model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(PatternError::Config(
                "gemini.temperature must be within 0.0..=2.0".into(),
            ));
        }
        Ok(())
    }
}
