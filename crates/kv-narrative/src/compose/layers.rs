//! Scene text layers: base, thermal, lens, and conditional inserts.

use std::collections::BTreeMap;
use std::fmt;

use kv_core::{Condition, GameSnapshot};
use serde::{Deserialize, Serialize};

/// The interpretive lens the player sees a scene through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lens {
    /// Sees the supernatural.
    Believer,
    /// Sees the rational.
    Skeptic,
    /// Sees the past.
    Haunted,
    /// No overlay.
    #[default]
    Neutral,
}

impl Lens {
    /// All lenses.
    pub const ALL: [Lens; 4] = [Self::Believer, Self::Skeptic, Self::Haunted, Self::Neutral];

    /// Parse a lens name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "believer" => Some(Self::Believer),
            "skeptic" | "sceptic" => Some(Self::Skeptic),
            "haunted" => Some(Self::Haunted),
            "neutral" | "none" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// The key used for authored lens text.
    pub fn name(self) -> &'static str {
        match self {
            Self::Believer => "believer",
            Self::Skeptic => "skeptic",
            Self::Haunted => "haunted",
            Self::Neutral => "neutral",
        }
    }

    /// Fallback line used when a scene has no authored text for this lens.
    pub fn atmosphere(self) -> Option<&'static str> {
        match self {
            Self::Believer => Some("The air feels charged with something unseen."),
            Self::Skeptic => Some("There's a rational explanation. There always is."),
            Self::Haunted => Some("You've seen this before. Haven't you?"),
            Self::Neutral => None,
        }
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a conditional insert lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertPosition {
    /// Right after the base text, on a new line.
    AfterBase,
    /// After the lens layer, on a new line.
    #[default]
    AfterLens,
    /// At the end, as its own paragraph.
    BeforeChoices,
}

impl InsertPosition {
    /// The separator placed before an insert at this position.
    pub fn separator(self) -> &'static str {
        match self {
            Self::AfterBase | Self::AfterLens => "\n",
            Self::BeforeChoices => "\n\n",
        }
    }
}

/// Optional text spliced in when its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInsert {
    /// Insert id, reported in [`ComposedText`](super::ComposedText).
    pub id: String,
    /// The text.
    pub text: String,
    /// When it applies.
    #[serde(default)]
    pub condition: Condition,
    /// Where it goes.
    #[serde(default)]
    pub position: InsertPosition,
}

impl TextInsert {
    /// Create an unconditional insert after the lens layer.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            condition: Condition::Always,
            position: InsertPosition::AfterLens,
        }
    }

    /// Set the condition (builder style).
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the position (builder style).
    pub fn at(mut self, position: InsertPosition) -> Self {
        self.position = position;
        self
    }

    /// Whether this insert should be spliced in.
    pub fn applies(&self, snapshot: &GameSnapshot) -> bool {
        self.condition.evaluate(snapshot)
    }
}

/// All authored text for one scene, clue, or dialogue line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneText {
    /// Objective anchor text.
    #[serde(default)]
    pub base: String,
    /// Replacement text while thermal vision is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<String>,
    /// Authored text per lens name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lens: BTreeMap<String, String>,
    /// Conditional inserts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inserts: Vec<TextInsert>,
}

impl SceneText {
    /// Plain text with no layers.
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Set thermal text (builder style).
    pub fn with_thermal(mut self, thermal: impl Into<String>) -> Self {
        self.thermal = Some(thermal.into());
        self
    }

    /// Set authored lens text (builder style).
    pub fn with_lens(mut self, lens: Lens, text: impl Into<String>) -> Self {
        self.lens.insert(lens.name().to_string(), text.into());
        self
    }

    /// Add an insert (builder style).
    pub fn with_insert(mut self, insert: TextInsert) -> Self {
        self.inserts.push(insert);
        self
    }

    /// Authored text for `lens`, if any.
    pub fn lens_text(&self, lens: Lens) -> Option<&str> {
        self.lens
            .get(lens.name())
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_parse_and_atmosphere() {
        assert_eq!(Lens::parse("Haunted"), Some(Lens::Haunted));
        assert_eq!(Lens::parse("sceptic"), Some(Lens::Skeptic));
        assert_eq!(Lens::parse("cynic"), None);
        assert!(Lens::Neutral.atmosphere().is_none());
        assert!(Lens::Believer.atmosphere().unwrap().contains("unseen"));
    }

    #[test]
    fn insert_position_serde_names() {
        let json = serde_json::to_string(&InsertPosition::BeforeChoices).unwrap();
        assert_eq!(json, "\"BEFORE_CHOICES\"");
        let back: InsertPosition = serde_json::from_str("\"AFTER_BASE\"").unwrap();
        assert_eq!(back, InsertPosition::AfterBase);
    }

    #[test]
    fn insert_condition_gates() {
        let insert = TextInsert::new("blood", "A smear of blood on the sill.")
            .when(Condition::skill_at_least("Forensics", 3));
        assert!(!insert.applies(&GameSnapshot::default()));
        assert!(insert.applies(&GameSnapshot::default().with_skill("Forensics", 3)));
    }

    #[test]
    fn blank_lens_text_ignored() {
        let text = SceneText::plain("A diner.").with_lens(Lens::Skeptic, "  ");
        assert_eq!(text.lens_text(Lens::Skeptic), None);
    }
}
