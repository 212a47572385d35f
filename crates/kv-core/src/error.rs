/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating core game data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Evidence with the same id is already in the log.
    #[error("evidence already collected: \"{0}\"")]
    DuplicateEvidence(String),

    /// The requested evidence id is not in the log.
    #[error("evidence not found: \"{0}\"")]
    UnknownEvidence(String),

    /// Evidence data could not be decoded.
    #[error("invalid evidence data: {0}")]
    Json(#[from] serde_json::Error),
}
