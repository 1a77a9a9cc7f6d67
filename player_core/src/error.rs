// Typed errors with thiserror. Surface meaningful messages to JS.
// Nothing here is fatal: callers log and keep the page alive.

use thiserror::Error;

/// Player error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing element with id '{0}'")]
    MissingElement(String),

    #[error("Element '{id}' is not a {expected}")]
    ElementType { id: String, expected: &'static str },

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Playback request failed: {0}")]
    Playback(String),

    #[error("Fullscreen request failed: {0}")]
    Fullscreen(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::Serialization(err.to_string())
    }
}
