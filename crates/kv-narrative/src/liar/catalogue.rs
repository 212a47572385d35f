//! Authorable contradiction patterns.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, NarrativeResult};

/// A contradiction pattern as authored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Unique id.
    pub id: String,
    /// Case-insensitive regular expression matched against dialogue.
    pub pattern: String,
    /// Evidence tags that falsify a matching claim.
    pub falsified_by: Vec<String>,
    /// Explanation shown when the lie is caught.
    pub message: String,
}

impl PatternSpec {
    /// Create a pattern spec.
    pub fn new(id: &str, pattern: &str, falsified_by: &[&str], message: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            falsified_by: falsified_by.iter().map(|t| (*t).to_string()).collect(),
            message: message.to_string(),
        }
    }

    /// Compile the regex and check the pattern is usable.
    pub fn compile(&self) -> NarrativeResult<CompiledPattern> {
        if self.falsified_by.iter().all(|t| t.trim().is_empty()) {
            return Err(NarrativeError::InvalidConfig(format!(
                "pattern '{}' has no falsifying tags",
                self.id
            )));
        }
        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| NarrativeError::InvalidPattern {
                id: self.id.clone(),
                source,
            })?;
        Ok(CompiledPattern {
            spec: self.clone(),
            regex,
        })
    }
}

/// A pattern ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    spec: PatternSpec,
    regex: Regex,
}

impl CompiledPattern {
    /// The authored spec.
    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    /// The first matching phrase in `text`, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// The built-in catalogue.
pub fn default_patterns() -> Vec<PatternSpec> {
    vec![
        PatternSpec::new(
            "witness_seen",
            r"no one (?:.+)?(was there|around)",
            &["witness_seen"],
            "They're lying. You have a witness who says otherwise.",
        ),
        PatternSpec::new(
            "police_record",
            r"no (?:records|file)",
            &["police_record"],
            "The precinct files you saw prove this is a lie.",
        ),
        PatternSpec::new(
            "ongoing_activity",
            r"(?:never|not) (?:actually )?(stopped|ceased)",
            &["ongoing_activity"],
            "Wait... your findings suggest it never actually stopped.",
        ),
        PatternSpec::new(
            "camera_footage_woods",
            r"(?:at home|all night)",
            &["camera_footage_woods"],
            "The VHS tape shows them at the treeline at 03:00. Liar.",
        ),
        PatternSpec::new(
            "aurora_footage",
            r"never seen (?:the |any )?(lights|aurora)",
            &["aurora_footage"],
            "Liars... everyone in this town has seen it. You have the tape.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compile() {
        let patterns = default_patterns();
        assert_eq!(patterns.len(), 5);
        for spec in &patterns {
            spec.compile().unwrap();
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let compiled = default_patterns()[0].compile().unwrap();
        assert_eq!(
            compiled.find("I was alone. No one else was around that night."),
            Some("No one else was around")
        );
        assert_eq!(compiled.find("Someone was there."), None);
    }

    #[test]
    fn bad_regex_is_invalid_pattern() {
        let err = PatternSpec::new("broken", "(unclosed", &["x"], "m")
            .compile()
            .unwrap_err();
        assert!(matches!(err, NarrativeError::InvalidPattern { ref id, .. } if id == "broken"));
    }

    #[test]
    fn empty_tags_rejected() {
        let err = PatternSpec::new("untagged", "lie", &[], "m").compile().unwrap_err();
        assert!(matches!(err, NarrativeError::InvalidConfig(_)));
    }
}
