//! Error types for the narrative engine.

use thiserror::Error;

/// Result type for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors that can occur in the narrative engine.
///
/// "Nothing recognized" and "nothing contradicted" are not errors; those
/// paths return empty results.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// A psychological dimension name is not known.
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// A contradiction pattern failed to compile.
    #[error("invalid contradiction pattern '{id}': {source}")]
    InvalidPattern {
        /// Pattern id.
        id: String,
        /// Regex compile error.
        source: regex::Error,
    },

    /// A condition string in content failed to parse.
    #[error("malformed condition in {context}: {message}")]
    MalformedCondition {
        /// Where the condition appeared, e.g. `scene 'diner' insert 'blood'`.
        context: String,
        /// Parser diagnostics, one line.
        message: String,
    },

    /// Structurally invalid configuration or content.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A scene id was referenced that the content pack does not contain.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// JSON could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Evidence log error.
    #[error("{0}")]
    Core(#[from] kv_core::CoreError),
}
