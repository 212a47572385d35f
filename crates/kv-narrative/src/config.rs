//! Session-scoped configuration.
//!
//! Every tunable the engine reads lives here: tier boundaries, distortion
//! thresholds and probabilities, the verb and object synonym tables, and the
//! contradiction-pattern catalogue. A config is loaded and validated once at
//! session start and then passed in. Nothing is read from globals.

use std::collections::{BTreeMap, HashMap, HashSet};

use kv_mechanics::Skill;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NarrativeError, NarrativeResult};
use crate::liar::{PatternSpec, default_patterns};
use crate::parser::verbs::default_verb_table;

/// Thresholds for the psychological derived reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsycheThresholds {
    /// Sanity boundaries between Fractured/Paranoid/Distracted/Clear, ascending.
    pub stability_boundaries: [i32; 3],
    /// Minimum sanity for Lucid/Clouded/Fraying/Critical, descending.
    pub clarity_thresholds: [i32; 4],
    /// Sanity below which the legacy glitch distortion starts.
    pub distortion_ceiling: i32,
}

impl Default for PsycheThresholds {
    fn default() -> Self {
        Self {
            stability_boundaries: [25, 50, 75],
            clarity_thresholds: [90, 70, 50, 30],
            distortion_ceiling: 60,
        }
    }
}

impl PsycheThresholds {
    /// Per-word legacy glitch chance at `sanity`.
    pub fn distortion_probability(self, sanity: i32) -> f64 {
        f64::from((self.distortion_ceiling - sanity).max(0)) / 100.0
    }
}

/// Stress and doubt text transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    /// Stress above this perturbs text.
    pub stress_threshold: i32,
    /// Doubt above this hedges certainty markers.
    pub doubt_threshold: i32,
    /// Per-word corruption chance at full stress intensity.
    pub word_rate: f64,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            stress_threshold: 50,
            doubt_threshold: 50,
            word_rate: 0.35,
        }
    }
}

/// The fracture gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractureConfig {
    /// Chance of a fracture while the player is in an unsafe state.
    pub probability: f64,
    /// Chance of a fracture otherwise.
    pub base_chance: f64,
    /// Attention at or above this is unsafe.
    pub attention_threshold: i32,
    /// Obsession at or above this is unsafe.
    pub obsession_threshold: i32,
}

impl Default for FractureConfig {
    fn default() -> Self {
        Self {
            probability: 0.15,
            base_chance: 0.0,
            attention_threshold: 75,
            obsession_threshold: 75,
        }
    }
}

/// Contradiction detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiarConfig {
    /// Skill that gates detection.
    pub skill: String,
    /// Difficulty of the gating check.
    pub difficulty: i32,
    /// The pattern catalogue.
    pub patterns: Vec<PatternSpec>,
}

impl Default for LiarConfig {
    fn default() -> Self {
        Self {
            skill: Skill::Skepticism.name().to_string(),
            difficulty: 8,
            patterns: default_patterns(),
        }
    }
}

/// Everything the narrative engine is tuned by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Psychological thresholds.
    pub psyche: PsycheThresholds,
    /// Stress/doubt distortion.
    pub distortion: DistortionConfig,
    /// Fracture gate.
    pub fracture: FractureConfig,
    /// Contradiction detection.
    pub liar: LiarConfig,
    /// Canonical verb to surface synonyms.
    pub verbs: BTreeMap<String, Vec<String>>,
    /// Canonical object id to surface names.
    pub objects: BTreeMap<String, Vec<String>>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            psyche: PsycheThresholds::default(),
            distortion: DistortionConfig::default(),
            fracture: FractureConfig::default(),
            liar: LiarConfig::default(),
            verbs: default_verb_table(),
            objects: BTreeMap::new(),
        }
    }
}

impl NarrativeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> NarrativeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            verbs = config.verbs.len(),
            patterns = config.liar.patterns.len(),
            "narrative config loaded"
        );
        Ok(config)
    }

    /// Set the fracture probability (clamped to 0–1).
    pub fn with_fracture_probability(mut self, probability: f64) -> Self {
        self.fracture.probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the stress threshold (clamped to 0–100).
    pub fn with_stress_threshold(mut self, threshold: i32) -> Self {
        self.distortion.stress_threshold = threshold.clamp(0, 100);
        self
    }

    /// Set the doubt threshold (clamped to 0–100).
    pub fn with_doubt_threshold(mut self, threshold: i32) -> Self {
        self.distortion.doubt_threshold = threshold.clamp(0, 100);
        self
    }

    /// Set the gating check difficulty.
    pub fn with_liar_difficulty(mut self, difficulty: i32) -> Self {
        self.liar.difficulty = difficulty;
        self
    }

    /// Register a global object synonym.
    pub fn with_object_synonym(mut self, canonical: &str, surface: &str) -> Self {
        self.objects
            .entry(canonical.to_string())
            .or_default()
            .push(surface.to_lowercase());
        self
    }

    /// The gating skill, parsed.
    pub fn liar_skill(&self) -> NarrativeResult<Skill> {
        Skill::parse(&self.liar.skill).ok_or_else(|| {
            NarrativeError::InvalidConfig(format!("unknown gating skill '{}'", self.liar.skill))
        })
    }

    /// Check structural validity. This is the only fatal path at load time.
    pub fn validate(&self) -> NarrativeResult<()> {
        let [a, b, c] = self.psyche.stability_boundaries;
        let ascending = 0 <= a && a < b && b < c && c <= 100;
        if !ascending {
            return Err(invalid(format!(
                "stability boundaries must ascend within 0..=100, got {:?}",
                self.psyche.stability_boundaries
            )));
        }
        let t = self.psyche.clarity_thresholds;
        let descending = t[0] <= 100 && t[0] > t[1] && t[1] > t[2] && t[2] > t[3] && t[3] >= 0;
        if !descending {
            return Err(invalid(format!(
                "clarity thresholds must descend within 0..=100, got {t:?}"
            )));
        }
        if !(0..=100).contains(&self.psyche.distortion_ceiling) {
            return Err(invalid("distortion ceiling must be within 0..=100"));
        }
        for (name, p) in [
            ("fracture.probability", self.fracture.probability),
            ("fracture.base_chance", self.fracture.base_chance),
            ("distortion.word_rate", self.distortion.word_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be within 0..=1, got {p}")));
            }
        }
        self.liar_skill()?;
        self.validate_patterns()?;
        validate_synonyms("verb", &self.verbs)?;
        validate_synonyms("object", &self.objects)?;
        Ok(())
    }

    fn validate_patterns(&self) -> NarrativeResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.liar.patterns {
            if !seen.insert(spec.id.as_str()) {
                return Err(invalid(format!("duplicate pattern id '{}'", spec.id)));
            }
            spec.compile()?;
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> NarrativeError {
    NarrativeError::InvalidConfig(message.into())
}

/// Reject empty entries and a surface form claimed by two canonicals.
pub(crate) fn validate_synonyms(kind: &str, table: &BTreeMap<String, Vec<String>>) -> NarrativeResult<()> {
    let mut owner: HashMap<String, &str> = HashMap::new();
    for (canonical, synonyms) in table {
        let canonical = canonical.as_str();
        if canonical.trim().is_empty() {
            return Err(invalid(format!("empty canonical {kind}")));
        }
        for surface in synonyms.iter().map(String::as_str).chain(std::iter::once(canonical)) {
            let surface = surface.trim().to_lowercase();
            if surface.is_empty() {
                return Err(invalid(format!("empty synonym for {kind} '{canonical}'")));
            }
            if let Some(previous) = owner.insert(surface.clone(), canonical)
                && previous != canonical
            {
                return Err(invalid(format!(
                    "{kind} synonym '{surface}' claimed by both '{previous}' and '{canonical}'"
                )));
            }
        }
    }
    Ok(())
}
