//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A skill name is not part of the taxonomy.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// A scripted dice sequence could not be parsed.
    #[error("invalid dice sequence: {0}")]
    InvalidDice(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
