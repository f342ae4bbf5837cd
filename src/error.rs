//! Error types for emotion pattern resolution.
//!
//! Each variant carries a stable error code accessible via
//! [`PatternError::code()`]. Only [`PatternError::InvalidInput`] ever reaches
//! an HTTP caller; the AI-path errors are recovered by the resolver.

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Emotion text was empty or missing.
    pub const INVALID_INPUT: &str = "INVALID_INPUT";

    /// The external text-generation call failed (network, auth, quota, timeout).
    pub const EXTERNAL_SERVICE: &str = "EXTERNAL_SERVICE";

    /// The model answered, but not with a usable pattern.
    pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";

    /// Invalid or unreadable configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// File or socket I/O failure.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Errors produced while resolving an emotion into a movement pattern.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Emotion text was empty after trimming.
    #[error("[{}] {}", error_codes::INVALID_INPUT, .0)]
    InvalidInput(String),

    /// The external text-generation service failed or timed out.
    #[error("[{}] {}", error_codes::EXTERNAL_SERVICE, .0)]
    ExternalService(String),

    /// The model output could not be reduced to a pattern.
    #[error("[{}] {}", error_codes::MALFORMED_RESPONSE, .0)]
    MalformedResponse(String),

    /// Configuration error.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// I/O error.
    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(#[from] std::io::Error),
}

impl PatternError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => error_codes::INVALID_INPUT,
            Self::ExternalService(_) => error_codes::EXTERNAL_SERVICE,
            Self::MalformedResponse(_) => error_codes::MALFORMED_RESPONSE,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Returns true when the resolver should answer from the keyword
    /// classifier instead of surfacing this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::MalformedResponse(_))
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PatternError>;
