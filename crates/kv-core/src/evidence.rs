use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The kind of an evidence item. Extensible via `Custom(String)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceCategory {
    /// Something a person said.
    Testimony,
    /// A physical object or trace.
    Physical,
    /// Files, records, letters.
    Document,
    /// A photograph taken by the player.
    Photograph,
    /// Audio or video tape.
    Recording,
    /// User-defined category.
    Custom(String),
}

impl EvidenceCategory {
    /// Parse a category name. Unknown names become `Custom`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "testimony" => Self::Testimony,
            "physical" => Self::Physical,
            "document" => Self::Document,
            "photograph" | "photo" => Self::Photograph,
            "recording" | "tape" => Self::Recording,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EvidenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testimony => write!(f, "testimony"),
            Self::Physical => write!(f, "physical"),
            Self::Document => write!(f, "document"),
            Self::Photograph => write!(f, "photograph"),
            Self::Recording => write!(f, "recording"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// A collected clue.
///
/// Tags drive contradiction matching and are independent of the display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Unique identifier, e.g. `witness_01`.
    pub id: String,
    /// Player-facing description.
    pub description: String,
    /// What sort of evidence this is.
    pub category: EvidenceCategory,
    /// Labels used for contradiction matching.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Where it was found, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the player collected it.
    #[serde(default = "Utc::now")]
    pub collected_at: DateTime<Utc>,
}

impl Evidence {
    /// Create an untagged evidence item collected now.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: EvidenceCategory,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            category,
            tags: BTreeSet::new(),
            location: None,
            collected_at: Utc::now(),
        }
    }

    /// Add a tag (builder style).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set where this was found (builder style).
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Whether this item carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// The player's investigation log.
///
/// Append-only: evidence is never removed, and tags only change through
/// [`EvidenceLog::add_tag`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EvidenceLog {
    items: Vec<Evidence>,
}

impl EvidenceLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of evidence, rejecting duplicate ids.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let items: Vec<Evidence> = serde_json::from_str(json)?;
        Self::try_from(items)
    }

    /// Append a new item. Fails if the id is already present.
    pub fn add(&mut self, evidence: Evidence) -> CoreResult<()> {
        if self.contains(&evidence.id) {
            return Err(CoreError::DuplicateEvidence(evidence.id));
        }
        self.items.push(evidence);
        Ok(())
    }

    /// Attach a tag to an existing item. Returns `true` if the tag was new.
    pub fn add_tag(&mut self, id: &str, tag: impl Into<String>) -> CoreResult<bool> {
        let item = self
            .items
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::UnknownEvidence(id.to_string()))?;
        Ok(item.tags.insert(tag.into()))
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&Evidence> {
        self.items.iter().find(|e| e.id == id)
    }

    /// Whether an item with this id has been collected.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Evidence> {
        self.items.iter()
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every tag held, plus every evidence id.
    pub fn tags(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .flat_map(|e| e.tags.iter().cloned().chain(std::iter::once(e.id.clone())))
            .collect()
    }

    /// The first item carrying `tag` (or whose id equals `tag`).
    pub fn first_with_tag(&self, tag: &str) -> Option<&Evidence> {
        self.items.iter().find(|e| e.id == tag || e.has_tag(tag))
    }
}

impl TryFrom<Vec<Evidence>> for EvidenceLog {
    type Error = CoreError;

    fn try_from(items: Vec<Evidence>) -> CoreResult<Self> {
        let mut log = Self::new();
        for item in items {
            log.add(item)?;
        }
        Ok(log)
    }
}
