//! Passive clue discovery and menu fractures.

use std::collections::BTreeSet;
use std::fmt;

use kv_core::{Condition, GameSnapshot};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compose::{FractureHistory, FractureKind, TextComposer, apply_fracture};

/// Label used by [`unsafe_moment`] when none is given.
pub const DEFAULT_MENU_LABEL: &str = "SYSTEM MENU";

/// How a revealed clue is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealStyle {
    /// A notice panel.
    #[default]
    Panel,
    /// A quiet aside.
    Whisper,
    /// Forced into the narration.
    Intrusive,
}

impl fmt::Display for RevealStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panel => write!(f, "panel"),
            Self::Whisper => write!(f, "whisper"),
            Self::Intrusive => write!(f, "intrusive"),
        }
    }
}

/// A clue the player notices without asking, once its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveClue {
    /// Clue id.
    pub clue_id: String,
    /// What the player notices.
    #[serde(default)]
    pub text: String,
    /// When it becomes visible.
    #[serde(default)]
    pub visible_when: Condition,
    /// Presentation.
    #[serde(default)]
    pub reveal_style: RevealStyle,
}

/// A clue revealed this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revealed {
    /// Clue id.
    pub clue_id: String,
    /// Clue text.
    pub text: String,
    /// Presentation.
    pub style: RevealStyle,
}

/// Remembers which passive clues have been revealed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryTracker {
    discovered: BTreeSet<String>,
}

impl DiscoveryTracker {
    /// Nothing discovered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal every clue whose condition holds and that was not revealed before.
    pub fn evaluate(&mut self, clues: &[PassiveClue], snapshot: &GameSnapshot) -> Vec<Revealed> {
        let mut revealed = Vec::new();
        for clue in clues {
            if self.discovered.contains(&clue.clue_id) || !clue.visible_when.evaluate(snapshot) {
                continue;
            }
            self.discovered.insert(clue.clue_id.clone());
            info!(clue = %clue.clue_id, style = %clue.reveal_style, "passive clue revealed");
            revealed.push(Revealed {
                clue_id: clue.clue_id.clone(),
                text: clue.text.clone(),
                style: clue.reveal_style,
            });
        }
        revealed
    }

    /// Whether `clue_id` has been revealed.
    pub fn is_discovered(&self, clue_id: &str) -> bool {
        self.discovered.contains(clue_id)
    }

    /// Revealed ids, sorted.
    pub fn discovered(&self) -> impl Iterator<Item = &str> {
        self.discovered.iter().map(String::as_str)
    }

    /// Number revealed.
    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    /// Whether nothing has been revealed.
    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }
}

/// Pass menu text through the fracture gate, recording any firing.
pub fn fracture_menu<R: Rng>(
    composer: &TextComposer,
    label: &str,
    snapshot: &GameSnapshot,
    history: &mut FractureHistory,
    rng: &mut R,
) -> String {
    let (text, kind) = composer.fracture(label, snapshot, rng);
    if let Some(kind) = kind {
        history.record(kind, "menu");
    }
    text
}

/// Force a timestamp fracture onto a menu label.
pub fn unsafe_moment<R: Rng>(label: Option<&str>, history: &mut FractureHistory, rng: &mut R) -> String {
    let label = label.unwrap_or(DEFAULT_MENU_LABEL);
    history.record(FractureKind::Timestamp, "menu");
    apply_fracture(label, FractureKind::Timestamp, rng)
}
