//! Core types for Kaltvik: evidence, flags, conditions, and game-state snapshots.
//!
//! This crate defines the data model shared by the mechanics, the condition
//! language, and the narrative engine. It performs no I/O. Content and
//! evidence arrive already loaded, either constructed programmatically or
//! deserialized from JSON by the caller.

/// Closed condition AST and its interpreter.
pub mod condition;
/// Error types used throughout the crate.
pub mod error;
/// Evidence records and the append-only evidence log.
pub mod evidence;
/// Flag values stored in player state.
pub mod flag;
/// Session identifiers.
pub mod session;
/// Read-only view of player state used for condition evaluation.
pub mod snapshot;

/// Re-export condition types.
pub use condition::{CmpOp, Condition, Subject};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export evidence types.
pub use evidence::{Evidence, EvidenceCategory, EvidenceLog};
/// Re-export flag values.
pub use flag::FlagValue;
/// Re-export session identifiers.
pub use session::SessionId;
/// Re-export snapshot types.
pub use snapshot::{GameSnapshot, MentalReadings, normalize_key};
