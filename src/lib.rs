//! Emotion Pattern: turns free-text feelings into particle-animation parameters.
//!
//! Each request is resolved independently:
//! emotion text → model prompt → embedded JSON → bounded pattern,
//! with a keyword classifier answering whenever the model is absent or fails.
//!
//! # Architecture
//!
//! - **Validator**: coerces untrusted values into each field's range
//! - **Classifier**: ordered keyword table, first match wins
//! - **Generator**: prompts a [`TextGenerator`](generator::TextGenerator)
//!   (Gemini in production) and extracts the JSON it returns
//! - **Resolver**: model first, classifier fallback, validation always
//! - **Server**: axum HTTP front end with health and docs endpoints

pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod pattern;
pub mod resolver;
pub mod server;
pub mod validator;

pub use config::ServiceConfig;
pub use error::{PatternError, Result};
pub use pattern::{Behavior, MovementPattern, Provenance, ResolutionResult};
pub use resolver::PatternResolver;
pub use server::PatternServer;
