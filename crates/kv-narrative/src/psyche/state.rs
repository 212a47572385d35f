//! Mutable psychological state with derived reads.

use chrono::Utc;
use kv_core::MentalReadings;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::journal::{MentalEvent, MentalJournal};
use super::paranoia::ParanoiaVector;
use super::tier::{ClarityLabel, DoubtSymptom, ObsessionSymptom, StabilityTier, StressSymptom};
use super::Dimension;
use crate::config::PsycheThresholds;
use crate::error::NarrativeResult;

const MAX_SANITY: i32 = 100;
const SATURATION: i32 = 100;
/// Paranoia drained by a grounding exercise.
const GROUNDING_RELIEF: i32 = 5;

const STRESS_SYMPTOMS: [&str; 4] = [
    "Your temples throb.",
    "Your heart rate spikes.",
    "Gritting your teeth.",
    "A sharp migraine pierces your skull.",
];

/// Something the player can do to claw sanity back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// +5 sanity.
    DrinkWater,
    /// +10 sanity, -5 paranoia.
    Grounding,
}

impl RecoveryAction {
    /// Parse an action name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "drink_water" | "water" | "drink" => Some(Self::DrinkWater),
            "grounding" | "ground" => Some(Self::Grounding),
            _ => None,
        }
    }
}

/// One player's psychological state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychologicalState {
    sanity: i32,
    stress: i32,
    doubt: i32,
    obsession: i32,
    paranoia: ParanoiaVector,
    thresholds: PsycheThresholds,
    journal: MentalJournal,
    #[serde(skip)]
    feedback: Vec<String>,
}

impl Default for PsychologicalState {
    fn default() -> Self {
        Self::new(PsycheThresholds::default())
    }
}

impl PsychologicalState {
    /// Fresh state: sanity 100, everything else zero.
    pub fn new(thresholds: PsycheThresholds) -> Self {
        Self {
            sanity: MAX_SANITY,
            stress: 0,
            doubt: 0,
            obsession: 0,
            paranoia: ParanoiaVector::new(),
            thresholds,
            journal: MentalJournal::new(),
            feedback: Vec::new(),
        }
    }

    /// Current sanity.
    pub fn sanity(&self) -> i32 {
        self.sanity
    }

    /// Legacy name for sanity.
    pub fn stability(&self) -> i32 {
        self.sanity
    }

    /// Current stress.
    pub fn stress(&self) -> i32 {
        self.stress
    }

    /// Legacy name for stress.
    pub fn mental_load(&self) -> i32 {
        self.stress
    }

    /// Current doubt.
    pub fn doubt(&self) -> i32 {
        self.doubt
    }

    /// Current obsession.
    pub fn obsession(&self) -> i32 {
        self.obsession
    }

    /// Total paranoia magnitude.
    pub fn paranoia(&self) -> i32 {
        self.paranoia.magnitude()
    }

    /// Paranoia by source.
    pub fn paranoia_vector(&self) -> &ParanoiaVector {
        &self.paranoia
    }

    /// Read any dimension.
    pub fn get(&self, dimension: Dimension) -> i32 {
        match dimension.canonical() {
            Dimension::Stress => self.stress,
            Dimension::Doubt => self.doubt,
            Dimension::Obsession => self.obsession,
            Dimension::Paranoia => self.paranoia(),
            _ => self.sanity,
        }
    }

    /// The thresholds this state classifies against.
    pub fn thresholds(&self) -> PsycheThresholds {
        self.thresholds
    }

    /// Apply `delta` to `dimension`, clamping, and return the new value.
    ///
    /// Mirrors always read the same value as the dimension they mirror.
    /// Paranoia routes to [`update_paranoia`](Self::update_paranoia) with
    /// `cause` as the source.
    pub fn modify(&mut self, dimension: Dimension, delta: i32, cause: &str) -> i32 {
        if dimension == Dimension::Paranoia {
            return self.update_paranoia(cause, delta);
        }
        let before = self.get(dimension);
        let old_tier = self.get_tier();
        let after = match dimension.canonical() {
            Dimension::Stress => {
                self.stress = self.stress.saturating_add(delta).max(0);
                self.stress
            }
            Dimension::Doubt => {
                self.doubt = self.doubt.saturating_add(delta).max(0);
                self.doubt
            }
            Dimension::Obsession => {
                self.obsession = self.obsession.saturating_add(delta).max(0);
                self.obsession
            }
            _ => {
                self.sanity = self.sanity.saturating_add(delta).clamp(0, MAX_SANITY);
                self.sanity
            }
        };
        self.record(dimension, after - before, before, after, cause);
        self.push_feedback(dimension.canonical(), delta, cause, old_tier);
        after
    }

    /// [`modify`](Self::modify) by dimension name.
    pub fn modify_named(&mut self, name: &str, delta: i32, cause: &str) -> NarrativeResult<i32> {
        let dimension = Dimension::from_name(name)?;
        Ok(self.modify(dimension, delta, cause))
    }

    /// Shorthand for modifying sanity.
    pub fn modify_sanity(&mut self, delta: i32, cause: &str) -> i32 {
        self.modify(Dimension::Sanity, delta, cause)
    }

    /// Add `magnitude` to the `source` paranoia bucket and return the total.
    pub fn update_paranoia(&mut self, source: &str, magnitude: i32) -> i32 {
        let before = self.paranoia();
        let after = self.paranoia.add(source, magnitude);
        self.record(Dimension::Paranoia, after - before, before, after, source);
        after
    }

    /// Apply a recovery action and return its flavour line.
    pub fn recover(&mut self, action: RecoveryAction) -> &'static str {
        match action {
            RecoveryAction::DrinkWater => {
                self.modify_sanity(5, "drink water");
                "The cold water shocks your system. Focus returns."
            }
            RecoveryAction::Grounding => {
                self.modify_sanity(10, "grounding");
                let before = self.paranoia();
                self.paranoia.relieve(GROUNDING_RELIEF);
                let after = self.paranoia();
                self.record(Dimension::Paranoia, after - before, before, after, "grounding");
                "You recite the facts. Name. Date. Location. You are here."
            }
        }
    }

    /// Stability tier over sanity.
    pub fn get_tier(&self) -> StabilityTier {
        StabilityTier::from_value(self.sanity, self.thresholds.stability_boundaries)
    }

    /// Clarity label over sanity.
    pub fn get_clarity_label(&self) -> ClarityLabel {
        ClarityLabel::from_value(self.sanity, self.thresholds.clarity_thresholds)
    }

    /// Per-word chance of the legacy sanity glitch.
    pub fn get_text_distortion_probability(&self) -> f64 {
        self.thresholds.distortion_probability(self.sanity)
    }

    /// How stress currently shows.
    pub fn stress_symptom(&self) -> StressSymptom {
        StressSymptom::from_value(self.stress.min(SATURATION))
    }

    /// How doubt currently shows.
    pub fn doubt_symptom(&self) -> DoubtSymptom {
        DoubtSymptom::from_value(self.doubt.min(SATURATION))
    }

    /// How obsession currently shows.
    pub fn obsession_symptom(&self) -> ObsessionSymptom {
        ObsessionSymptom::from_value(self.obsession.min(SATURATION))
    }

    /// Whether narrative text should be distorted.
    pub fn should_distort_text(&self) -> bool {
        self.stress > 50 || self.sanity < 40
    }

    /// Whether false choices may be offered.
    pub fn should_hallucinate_options(&self) -> bool {
        self.obsession > 50 || self.sanity < 25
    }

    /// Whether facts may be withheld.
    pub fn should_hide_facts(&self) -> bool {
        self.doubt > 50
    }

    /// Chance of a hallucination right now.
    pub fn hallucination_chance(&self) -> f64 {
        let base = f64::from(MAX_SANITY - self.sanity) / 100.0;
        (base + f64::from(self.paranoia()) / 200.0).min(1.0)
    }

    /// Roll for a hallucination.
    pub fn roll_hallucination<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.hallucination_chance()
    }

    /// Snapshot for condition evaluation.
    pub fn readings(&self) -> MentalReadings {
        MentalReadings {
            sanity: self.sanity,
            stress: self.stress,
            doubt: self.doubt,
            obsession: self.obsession,
            paranoia: self.paranoia(),
        }
    }

    /// The mutation log.
    pub fn journal(&self) -> &MentalJournal {
        &self.journal
    }

    /// Drain the feedback lines produced since the last call.
    pub fn take_feedback(&mut self) -> Vec<String> {
        std::mem::take(&mut self.feedback)
    }

    /// A multi-line status block.
    pub fn summary(&self) -> String {
        format!(
            "=== MENTAL STATE ===\n\
             Stability: {} ({}%)\n\
             Clarity:   {}\n\
             Stress:    {} ({})\n\
             Doubt:     {} ({})\n\
             Obsession: {} ({})\n\
             Paranoia:  {}",
            self.get_tier(),
            self.sanity,
            self.get_clarity_label(),
            self.stress_symptom(),
            self.stress,
            self.doubt_symptom(),
            self.doubt,
            self.obsession_symptom(),
            self.obsession,
            self.paranoia(),
        )
    }

    fn record(&mut self, dimension: Dimension, delta: i32, before: i32, after: i32, cause: &str) {
        debug!(%dimension, delta, before, after, cause, "psychological mutation");
        self.journal.append(MentalEvent {
            dimension,
            delta,
            before,
            after,
            cause: cause.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn push_feedback(&mut self, dimension: Dimension, delta: i32, cause: &str, old_tier: StabilityTier) {
        if delta == 0 {
            return;
        }
        match dimension {
            Dimension::Sanity => {
                let line = if delta > 0 {
                    "You feel your grip tightening."
                } else {
                    "You feel a piece of yourself slip away."
                };
                self.feedback.push(format!("[{line}] ({cause})"));
                let tier = self.get_tier();
                if tier < old_tier {
                    self.feedback
                        .push(format!("[MENTAL STATE: {}]", tier.to_string().to_uppercase()));
                }
            }
            Dimension::Stress if delta > 0 => {
                let index = usize::try_from(self.stress / 25)
                    .unwrap_or(0)
                    .min(STRESS_SYMPTOMS.len() - 1);
                self.feedback.push(format!("[{}]", STRESS_SYMPTOMS[index]));
            }
            Dimension::Doubt if delta > 0 && self.doubt > 50 => {
                self.feedback.push("[Are you sure about that?]".to_string());
            }
            Dimension::Obsession if delta > 0 && self.obsession > 60 => {
                self.feedback
                    .push("[You can't stop thinking about it.]".to_string());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::error::NarrativeError;

    #[test]
    fn starts_clear_and_lucid() {
        let state = PsychologicalState::default();
        assert_eq!(state.sanity(), 100);
        assert_eq!(state.get_tier(), StabilityTier::Clear);
        assert_eq!(state.get_clarity_label(), ClarityLabel::Lucid);
    }

    #[test]
    fn sanity_walks_through_tiers() {
        let mut state = PsychologicalState::default();
        assert_eq!(state.modify_sanity(-70, "saw the body"), 30);
        assert_eq!(state.get_tier(), StabilityTier::Paranoid);
        assert_eq!(state.modify_sanity(30, "slept"), 60);
        assert_eq!(state.get_tier(), StabilityTier::Distracted);
    }

    #[test]
    fn distortion_probability() {
        let mut state = PsychologicalState::default();
        state.modify_sanity(-90, "test");
        assert_eq!(state.sanity(), 10);
        assert!((state.get_text_distortion_probability() - 0.5).abs() < 1e-9);

        let mut state = PsychologicalState::default();
        assert_eq!(state.get_text_distortion_probability(), 0.0);
        state.modify_sanity(-40, "test");
        assert_eq!(state.get_text_distortion_probability(), 0.0);
    }

    #[test]
    fn mirrors_stay_in_sync() {
        let mut state = PsychologicalState::default();
        state.modify(Dimension::MentalLoad, 30, "noise");
        assert_eq!(state.stress(), 30);
        assert_eq!(state.mental_load(), 30);
        state.modify(Dimension::Stability, -15, "shock");
        assert_eq!(state.sanity(), 85);
        assert_eq!(state.stability(), 85);
    }

    #[test]
    fn accumulators_floor_at_zero_only() {
        let mut state = PsychologicalState::default();
        assert_eq!(state.modify(Dimension::Doubt, -10, "relief"), 0);
        assert_eq!(state.modify(Dimension::Obsession, 250, "the lights"), 250);
        assert_eq!(state.obsession_symptom(), ObsessionSymptom::Obsessed);
    }

    #[test]
    fn unknown_dimension_errors() {
        let mut state = PsychologicalState::default();
        let err = state.modify_named("courage", 5, "pep talk").unwrap_err();
        assert!(matches!(err, NarrativeError::UnknownDimension(_)));
        assert_eq!(state.modify_named("Stress", 5, "noise").unwrap(), 5);
    }

    #[test]
    fn paranoia_routes_to_source() {
        let mut state = PsychologicalState::default();
        assert_eq!(state.modify(Dimension::Paranoia, 10, "isolation"), 10);
        assert_eq!(state.update_paranoia("contradiction", 5), 15);
        assert_eq!(state.paranoia_vector().dominant(), Some(("isolation", 10)));
    }

    #[test]
    fn mutations_are_journaled() {
        let mut state = PsychologicalState::default();
        state.modify_sanity(-150, "the void");
        state.update_paranoia("isolation", 4);
        let events = state.journal().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].delta, -100);
        assert_eq!(events[0].after, 0);
        assert_eq!(events[0].cause, "the void");
        assert_eq!(events[1].dimension, Dimension::Paranoia);
    }

    #[test]
    fn feedback_lines() {
        let mut state = PsychologicalState::default();
        state.modify(Dimension::Stress, 60, "chase");
        state.modify(Dimension::Doubt, 55, "lie");
        state.modify(Dimension::Obsession, 61, "symbol");
        state.modify_sanity(-30, "corpse");
        let lines = state.take_feedback();
        assert_eq!(lines[0], "[Gritting your teeth.]");
        assert_eq!(lines[1], "[Are you sure about that?]");
        assert_eq!(lines[2], "[You can't stop thinking about it.]");
        assert_eq!(lines[3], "[You feel a piece of yourself slip away.] (corpse)");
        assert_eq!(lines[4], "[MENTAL STATE: DISTRACTED]");
        assert!(state.take_feedback().is_empty());
    }

    #[test]
    fn triggers() {
        let mut state = PsychologicalState::default();
        assert!(!state.should_distort_text());
        state.modify(Dimension::Stress, 51, "x");
        assert!(state.should_distort_text());
        assert!(!state.should_hide_facts());
        state.modify(Dimension::Doubt, 51, "x");
        assert!(state.should_hide_facts());
        state.modify_sanity(-80, "x");
        assert!(state.should_hallucinate_options());
    }

    #[test]
    fn recovery() {
        let mut state = PsychologicalState::default();
        state.modify_sanity(-50, "x");
        state.update_paranoia("isolation", 8);
        state.recover(RecoveryAction::DrinkWater);
        assert_eq!(state.sanity(), 55);
        state.recover(RecoveryAction::Grounding);
        assert_eq!(state.sanity(), 65);
        assert_eq!(state.paranoia(), 3);
    }

    #[test]
    fn grounding_relieves_paranoia_at_cap() {
        let mut state = PsychologicalState::default();
        assert_eq!(state.update_paranoia("watchers", 150), 100);
        state.recover(RecoveryAction::Grounding);
        assert_eq!(state.paranoia(), 95);
        let last = state.journal().events().last().unwrap();
        assert_eq!(last.dimension, Dimension::Paranoia);
        assert_eq!((last.before, last.after, last.delta), (100, 95, -5));
        assert_eq!(state.journal().events()[0].delta, 100);
    }

    #[test]
    fn hallucination_chance_bounds() {
        let mut state = PsychologicalState::default();
        assert_eq!(state.hallucination_chance(), 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(!state.roll_hallucination(&mut rng));
        state.modify_sanity(-100, "x");
        state.update_paranoia("x", 100);
        assert_eq!(state.hallucination_chance(), 1.0);
        assert!(state.roll_hallucination(&mut rng));
    }

    #[test]
    fn readings_mirror_state() {
        let mut state = PsychologicalState::default();
        state.modify(Dimension::Stress, 12, "x");
        let readings = state.readings();
        assert_eq!(readings.sanity, 100);
        assert_eq!(readings.stress, 12);
    }

    proptest! {
        #[test]
        fn sanity_always_in_range(deltas in proptest::collection::vec(-500i32..500, 0..30)) {
            let mut state = PsychologicalState::default();
            for d in deltas {
                let v = state.modify_sanity(d, "prop");
                prop_assert!((0..=100).contains(&v));
                prop_assert_eq!(state.stability(), state.sanity());
            }
        }

        #[test]
        fn accumulators_never_negative(deltas in proptest::collection::vec(-500i32..500, 0..30)) {
            let mut state = PsychologicalState::default();
            for d in deltas {
                prop_assert!(state.modify(Dimension::Stress, d, "prop") >= 0);
                prop_assert!(state.modify(Dimension::Paranoia, d, "prop") >= 0);
                prop_assert!(state.paranoia() <= MAX_SANITY);
            }
        }
    }
}
