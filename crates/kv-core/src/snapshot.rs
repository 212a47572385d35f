use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::condition::Subject;
use crate::flag::FlagValue;

/// Normalize a skill, attribute, or character key for lookup.
///
/// Lowercases and treats `_` and `-` as spaces, so `occult_knowledge`,
/// `Occult-Knowledge`, and `Occult Knowledge` all match.
pub fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The psychological scalars exposed to conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalReadings {
    /// Sanity, 0–100.
    pub sanity: i32,
    /// Accumulated stress.
    pub stress: i32,
    /// Accumulated doubt.
    pub doubt: i32,
    /// Accumulated obsession.
    pub obsession: i32,
    /// Total paranoia magnitude.
    pub paranoia: i32,
}

impl Default for MentalReadings {
    fn default() -> Self {
        Self {
            sanity: 100,
            stress: 0,
            doubt: 0,
            obsession: 0,
            paranoia: 0,
        }
    }
}

/// A read-only copy of everything a condition may look at.
///
/// Built by the session once per evaluation pass. Missing keys read as
/// zero/unset rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Player flags.
    #[serde(default)]
    pub flags: BTreeMap<String, FlagValue>,
    /// Effective skill levels by name.
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    /// Attribute levels by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    /// Trust per character id.
    #[serde(default)]
    pub trust: BTreeMap<String, i32>,
    /// How much attention the player has drawn.
    #[serde(default)]
    pub attention: i32,
    /// Item ids carried.
    #[serde(default)]
    pub inventory: BTreeSet<String>,
    /// Item ids currently equipped.
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    /// Tags (and ids) of all held evidence.
    #[serde(default)]
    pub evidence_tags: BTreeSet<String>,
    /// Theory ids the player currently holds.
    #[serde(default)]
    pub theories: BTreeSet<String>,
    /// Whether thermal vision is active.
    #[serde(default)]
    pub thermal_mode: bool,
    /// Psychological readings.
    #[serde(default)]
    pub mental: MentalReadings,
}

impl GameSnapshot {
    /// Set a flag (builder style).
    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.flags.insert(key.into(), value.into());
        self
    }

    /// Set a skill level (builder style).
    pub fn with_skill(mut self, name: &str, level: i32) -> Self {
        self.skills.insert(normalize_key(name), level);
        self
    }

    /// Add an evidence tag (builder style).
    pub fn with_evidence_tag(mut self, tag: impl Into<String>) -> Self {
        self.evidence_tags.insert(tag.into());
        self
    }

    /// Set the mental readings (builder style).
    pub fn with_mental(mut self, mental: MentalReadings) -> Self {
        self.mental = mental;
        self
    }

    /// Look up a flag.
    pub fn flag(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Skill level by name, 0 if absent.
    pub fn skill(&self, name: &str) -> i32 {
        lookup(&self.skills, name)
    }

    /// Attribute level by name, 0 if absent.
    pub fn attribute(&self, name: &str) -> i32 {
        lookup(&self.attributes, name)
    }

    /// Trust toward a character, 0 if absent.
    pub fn trust_of(&self, who: &str) -> i32 {
        lookup(&self.trust, who)
    }

    /// Resolve a numeric subject.
    pub fn value_of(&self, subject: &Subject) -> i32 {
        match subject {
            Subject::Skill(name) => self.skill(name),
            Subject::Attribute(name) => self.attribute(name),
            Subject::Trust(who) => self.trust_of(who),
            Subject::Attention => self.attention,
            Subject::Sanity => self.mental.sanity,
            Subject::Stress => self.mental.stress,
            Subject::Doubt => self.mental.doubt,
            Subject::Obsession => self.mental.obsession,
            Subject::Paranoia => self.mental.paranoia,
        }
    }
}

fn lookup(map: &BTreeMap<String, i32>, name: &str) -> i32 {
    let wanted = normalize_key(name);
    map.iter()
        .find(|(k, _)| normalize_key(k) == wanted)
        .map_or(0, |(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_variants() {
        assert_eq!(normalize_key("Occult_Knowledge"), "occult knowledge");
        assert_eq!(normalize_key(" hand-to-hand combat "), "hand to hand combat");
    }

    #[test]
    fn skill_lookup_ignores_spelling() {
        let mut snap = GameSnapshot::default();
        snap.skills.insert("Pattern Recognition".into(), 4);
        assert_eq!(snap.skill("pattern_recognition"), 4);
        assert_eq!(snap.skill("Forensics"), 0);
    }

    #[test]
    fn value_of_subjects() {
        let mut snap = GameSnapshot::default().with_skill("Logic", 3);
        snap.attention = 80;
        snap.trust.insert("father_anders".into(), -2);
        assert_eq!(snap.value_of(&Subject::Skill("logic".into())), 3);
        assert_eq!(snap.value_of(&Subject::Attention), 80);
        assert_eq!(snap.value_of(&Subject::Trust("father_anders".into())), -2);
        assert_eq!(snap.value_of(&Subject::Sanity), 100);
    }

    #[test]
    fn deserializes_partial_json() {
        let snap: GameSnapshot =
            serde_json::from_str(r#"{"attention": 10, "flags": {"met_priest": true}}"#).unwrap();
        assert_eq!(snap.attention, 10);
        assert_eq!(snap.flag("met_priest"), Some(&FlagValue::Bool(true)));
        assert_eq!(snap.mental.sanity, 100);
    }
}
