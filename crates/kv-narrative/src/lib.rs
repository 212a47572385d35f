//! Narrative interpretation engine for Kaltvik.
//!
//! Turns raw player text into intents, tracks the player's psychological
//! state, renders scene and dialogue text conditioned on that state, and
//! catches characters contradicting the evidence the player holds.
//!
//! Everything is synchronous and owned by one session. Randomness is
//! injected as a seedable generator, and content and configuration arrive
//! as already-loaded strings or values. The engine performs no I/O.

/// Text layering, distortion, fractures and keyword highlighting.
pub mod compose;
/// Session-scoped configuration.
pub mod config;
/// Content packs and their loading.
pub mod content;
/// Passive clue discovery and menu fractures.
pub mod discovery;
/// Error types for the narrative engine.
pub mod error;
/// Contradiction detection.
pub mod liar;
/// Player command parsing.
pub mod parser;
/// The psychological state model.
pub mod psyche;
/// A player's session and the per-turn flow.
pub mod session;

/// Re-export composer types.
pub use compose::{ComposedLine, ComposedText, FractureKind, Highlighter, Lens, SceneText, TextComposer, TextInsert};
/// Re-export configuration types.
pub use config::NarrativeConfig;
/// Re-export content types.
pub use content::{ContentPack, DialogueLine, Scene};
/// Re-export discovery types.
pub use discovery::{DiscoveryTracker, PassiveClue, RevealStyle};
/// Re-export error types.
pub use error::{NarrativeError, NarrativeResult};
/// Re-export liar engine types.
pub use liar::{Contradiction, Interrupt, LiarEngine, PatternSpec, Severity};
/// Re-export parser types.
pub use parser::{CommandParser, Intent, ParseReport, SceneSynonyms};
/// Re-export psychological state types.
pub use psyche::{ClarityLabel, Dimension, PsychologicalState, RecoveryAction, StabilityTier};
/// Re-export session types.
pub use session::{InvestigationSession, SessionConfig, TurnEvent, TurnReport};
