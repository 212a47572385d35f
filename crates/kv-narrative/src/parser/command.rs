//! Free-text command normalization.

use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use super::synonyms::{LayeredSynonyms, SceneSynonyms, SynonymTable};
use crate::config::NarrativeConfig;

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Words stripped from the front of a target phrase.
const FILLERS: &[&str] = &["at", "to", "the", "a", "an", "with", "on"];

/// Words that always separate sub-commands.
const HARD_SEPARATORS: &[&str] = &["then"];

/// Separates sub-commands only when a verb follows.
const SOFT_SEPARATOR: &str = "and";

/// A parsed (verb, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Canonical verb.
    pub verb: String,
    /// Target phrase or canonical object id.
    pub target: Option<String>,
}

impl Intent {
    /// Create an intent.
    pub fn new(verb: impl Into<String>, target: Option<&str>) -> Self {
        Self {
            verb: verb.into(),
            target: target.map(str::to_string),
        }
    }

    /// The target, or an empty string.
    pub fn target_str(&self) -> &str {
        self.target.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {target}", self.verb),
            None => write!(f, "{}", self.verb),
        }
    }
}

/// A sub-command no verb matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unrecognized {
    /// Zero-based position of the sub-command in the input.
    pub clause: usize,
    /// The sub-command text, lowercased.
    pub fragment: String,
    /// Canonical verb the first word most resembles, if close enough.
    pub suggestion: Option<String>,
}

/// Everything [`CommandParser::parse_detailed`] found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Recognized intents, in input order.
    pub intents: Vec<Intent>,
    /// Sub-commands that yielded no intent.
    pub unrecognized: Vec<Unrecognized>,
}

impl ParseReport {
    /// Whether nothing at all was understood.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Turns raw player text into ordered intents.
///
/// Holds a global verb and object table from the session config and a
/// scene layer swapped by [`set_scene_synonyms`](Self::set_scene_synonyms).
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    verbs: LayeredSynonyms,
    objects: LayeredSynonyms,
}

impl CommandParser {
    /// Build from the session config.
    pub fn new(config: &NarrativeConfig) -> Self {
        Self {
            verbs: LayeredSynonyms::new(SynonymTable::from_map(&config.verbs)),
            objects: LayeredSynonyms::new(SynonymTable::from_map(&config.objects)),
        }
    }

    /// Replace the scene layer for all subsequent calls.
    pub fn set_scene_synonyms(&mut self, synonyms: &SceneSynonyms) {
        self.verbs.set_scene(SynonymTable::from_map(&synonyms.verbs));
        self.objects.set_scene(SynonymTable::from_map(&synonyms.objects));
    }

    /// Drop the scene layer.
    pub fn clear_scene_synonyms(&mut self) {
        self.verbs.clear_scene();
        self.objects.clear_scene();
    }

    /// Parse `raw` into intents. Unrecognized sub-commands are skipped.
    pub fn normalize(&self, raw: &str) -> Vec<Intent> {
        self.parse_detailed(raw).intents
    }

    /// Parse `raw`, also reporting what was not understood.
    pub fn parse_detailed(&self, raw: &str) -> ParseReport {
        let mut report = ParseReport::default();
        for (clause, command) in self.split(raw).into_iter().enumerate() {
            let words: Vec<&str> = command.iter().map(String::as_str).collect();
            match self.parse_single(&words) {
                Some(intent) => report.intents.push(intent),
                None => report.unrecognized.push(Unrecognized {
                    clause,
                    fragment: words.join(" "),
                    suggestion: self.suggest(words[0]),
                }),
            }
        }
        report
    }

    fn split(&self, raw: &str) -> Vec<Vec<String>> {
        let mut commands = Vec::new();
        for sentence in raw.split(['.', ';', '!']) {
            let words: Vec<String> = sentence
                .split_whitespace()
                .map(clean_word)
                .filter(|w| !w.is_empty())
                .collect();
            let mut current: Vec<String> = Vec::new();
            for (i, word) in words.iter().enumerate() {
                let rest: Vec<&str> = words[i + 1..].iter().map(String::as_str).collect();
                let separates = HARD_SEPARATORS.contains(&word.as_str())
                    || (word == SOFT_SEPARATOR && self.verbs.longest_prefix(&rest).is_some());
                if separates {
                    if !current.is_empty() {
                        commands.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(word.clone());
                }
            }
            if !current.is_empty() {
                commands.push(current);
            }
        }
        commands
    }

    fn parse_single(&self, words: &[&str]) -> Option<Intent> {
        let (verb, len) = self.verbs.longest_prefix(words)?;
        let mut target = &words[len..];
        while let Some(first) = target.first()
            && FILLERS.contains(first)
        {
            target = &target[1..];
        }
        let target = if target.is_empty() {
            None
        } else {
            Some(
                self.objects
                    .resolve(target)
                    .map(str::to_string)
                    .unwrap_or_else(|| target.join(" ")),
            )
        };
        Some(Intent {
            verb: verb.to_string(),
            target,
        })
    }

    fn suggest(&self, word: &str) -> Option<String> {
        self.verbs
            .pairs()
            .filter(|(surface, _)| !surface.contains(' '))
            .map(|(surface, canonical)| (jaro_winkler(word, &surface), canonical))
            .filter(|(score, _)| *score >= FUZZY_THRESHOLD)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, canonical)| canonical.to_string())
    }
}

fn clean_word(word: &str) -> String {
    let word = word.to_lowercase();
    if word == "?" {
        return word;
    }
    word.trim_matches(|c: char| matches!(c, ',' | '?' | '"' | '\'' | ':' | '(' | ')'))
        .to_string()
}
