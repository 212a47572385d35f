//! Two-layer synonym tables.
//!
//! A [`SynonymTable`] maps canonical ids to surface forms. A
//! [`LayeredSynonyms`] stacks a scene table over a global one: lookups try
//! the scene layer first, and scene entries only ever add surfaces.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Scene-scoped synonym overrides, as authored in content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSynonyms {
    /// Canonical verb to extra surface forms.
    pub verbs: BTreeMap<String, Vec<String>>,
    /// Canonical object id to surface names.
    pub objects: BTreeMap<String, Vec<String>>,
}

impl SceneSynonyms {
    /// Whether there is nothing to override.
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty() && self.objects.is_empty()
    }
}

/// Canonical id to surface forms, with a reverse index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    forward: BTreeMap<String, BTreeSet<String>>,
    reverse: BTreeMap<Vec<String>, String>,
}

impl SynonymTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from authored data. Each canonical id also matches itself.
    pub fn from_map(map: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (canonical, surfaces) in map {
            table.insert(canonical, canonical);
            for surface in surfaces {
                table.insert(canonical, surface);
            }
        }
        table
    }

    /// Register `surface` for `canonical`. Blank surfaces are ignored.
    pub fn insert(&mut self, canonical: &str, surface: &str) {
        let words = words_of(surface);
        if words.is_empty() {
            return;
        }
        self.forward
            .entry(canonical.to_string())
            .or_default()
            .insert(words.join(" "));
        self.reverse.insert(words, canonical.to_string());
    }

    /// The canonical id for an exact surface phrase.
    pub fn resolve(&self, phrase: &[&str]) -> Option<&str> {
        let key: Vec<String> = phrase.iter().map(|w| w.to_lowercase()).collect();
        self.reverse.get(&key).map(String::as_str)
    }

    /// The longest surface that prefixes `words`, as `(canonical, word count)`.
    pub fn longest_prefix(&self, words: &[&str]) -> Option<(&str, usize)> {
        (1..=words.len())
            .rev()
            .find_map(|n| self.resolve(&words[..n]).map(|c| (c, n)))
    }

    /// Surfaces registered for a canonical id.
    pub fn surfaces_of(&self, canonical: &str) -> impl Iterator<Item = &str> {
        self.forward
            .get(canonical)
            .into_iter()
            .flat_map(|s| s.iter().map(String::as_str))
    }

    /// Every `(surface, canonical)` pair.
    pub fn pairs(&self) -> impl Iterator<Item = (String, &str)> {
        self.reverse
            .iter()
            .map(|(words, canonical)| (words.join(" "), canonical.as_str()))
    }

    /// Canonical ids.
    pub fn canonicals(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    /// Number of canonical ids.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// A scene layer over a global layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredSynonyms {
    global: SynonymTable,
    scene: SynonymTable,
}

impl LayeredSynonyms {
    /// Wrap a global table with an empty scene layer.
    pub fn new(global: SynonymTable) -> Self {
        Self {
            global,
            scene: SynonymTable::new(),
        }
    }

    /// Replace the scene layer.
    pub fn set_scene(&mut self, scene: SynonymTable) {
        self.scene = scene;
    }

    /// Drop the scene layer.
    pub fn clear_scene(&mut self) {
        self.scene = SynonymTable::new();
    }

    /// Exact phrase lookup, scene first.
    pub fn resolve(&self, phrase: &[&str]) -> Option<&str> {
        self.scene
            .resolve(phrase)
            .or_else(|| self.global.resolve(phrase))
    }

    /// Longest prefix match across both layers. The scene layer wins ties.
    pub fn longest_prefix(&self, words: &[&str]) -> Option<(&str, usize)> {
        let scene = self.scene.longest_prefix(words);
        let global = self.global.longest_prefix(words);
        match (scene, global) {
            (Some(s), Some(g)) if g.1 > s.1 => Some(g),
            (Some(s), _) => Some(s),
            (None, g) => g,
        }
    }

    /// Every surface in both layers with its canonical id.
    pub fn pairs(&self) -> impl Iterator<Item = (String, &str)> {
        self.scene.pairs().chain(self.global.pairs())
    }

    /// The global layer.
    pub fn global(&self) -> &SynonymTable {
        &self.global
    }

    /// The scene layer.
    pub fn scene(&self) -> &SynonymTable {
        &self.scene
    }
}

/// Lowercased whitespace-separated words.
pub(crate) fn words_of(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_lowercase).collect()
}
