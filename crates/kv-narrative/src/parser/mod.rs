//! Player command parsing.
//!
//! Raw text is split into sub-commands, each matched against the canonical
//! verb vocabulary through a two-layer synonym table, with the remainder
//! resolved through an object synonym table.

mod command;
mod synonyms;
pub mod verbs;

pub use command::{CommandParser, Intent, ParseReport, Unrecognized};
pub use synonyms::{LayeredSynonyms, SceneSynonyms, SynonymTable};
