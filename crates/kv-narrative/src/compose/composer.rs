//! The text composer pipeline.

use kv_core::{GameSnapshot, MentalReadings};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::distort::{Distortion, doubt_filter, sanity_glitch, stress_distort};
use super::fracture::{FractureKind, apply_fracture, fracture_gate};
use super::layers::{InsertPosition, Lens, SceneText};
use crate::config::{DistortionConfig, FractureConfig, NarrativeConfig, PsycheThresholds};

/// The result of composing one block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedText {
    /// What the player sees.
    pub full_text: String,
    /// Layered text before any distortion or fracture.
    pub raw_text: String,
    /// Whether the base text was used.
    pub base_used: bool,
    /// Whether thermal text replaced the base.
    pub thermal_used: bool,
    /// Lens that contributed a layer, if any.
    pub lens_used: Option<Lens>,
    /// Ids of inserts whose condition held.
    pub inserts_applied: Vec<String>,
    /// Transforms that changed the text, in order.
    pub distortions: Vec<Distortion>,
    /// Fracture that fired, if any.
    pub fracture: Option<FractureKind>,
}

impl ComposedText {
    fn layered(text: String) -> Self {
        Self {
            full_text: text.clone(),
            raw_text: text,
            base_used: false,
            thermal_used: false,
            lens_used: None,
            inserts_applied: Vec::new(),
            distortions: Vec::new(),
            fracture: None,
        }
    }

    /// Whether the player sees something other than the layered text.
    pub fn is_altered(&self) -> bool {
        self.full_text != self.raw_text
    }
}

/// A composed dialogue line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedLine {
    /// Speaker as displayed.
    pub speaker: String,
    /// The line.
    pub text: ComposedText,
}

/// Renders scene, clue and dialogue text against the player's state.
///
/// Layers come first (base or thermal, lens, conditional inserts). The
/// state-driven transforms run on the finished layers. The fracture gate
/// runs last since it may discard the text entirely.
#[derive(Debug, Clone, Default)]
pub struct TextComposer {
    thresholds: PsycheThresholds,
    distortion: DistortionConfig,
    fracture: FractureConfig,
}

impl TextComposer {
    /// Build from the session config.
    pub fn new(config: &NarrativeConfig) -> Self {
        Self {
            thresholds: config.psyche,
            distortion: config.distortion,
            fracture: config.fracture,
        }
    }

    /// Full pipeline: layers, distortion, fracture gate.
    pub fn compose<R: Rng>(
        &self,
        id: &str,
        text: &SceneText,
        lens: Lens,
        snapshot: &GameSnapshot,
        rng: &mut R,
    ) -> ComposedText {
        let mut composed = self.layer(id, text, lens, snapshot);
        if !composed.base_used && !composed.thermal_used {
            return composed;
        }
        let (distorted, distortions) = self.distort(&composed.full_text, &snapshot.mental, rng);
        composed.full_text = distorted;
        composed.distortions = distortions;
        if let Some(kind) = fracture_gate(snapshot, &self.fracture, rng) {
            composed.full_text = apply_fracture(&composed.full_text, kind, rng);
            composed.fracture = Some(kind);
        }
        debug!(
            id,
            distortions = composed.distortions.len(),
            fractured = composed.fracture.is_some(),
            "composed"
        );
        composed
    }

    /// Layers only: no distortion, no fracture.
    pub fn layer(&self, id: &str, text: &SceneText, lens: Lens, snapshot: &GameSnapshot) -> ComposedText {
        let thermal = text
            .thermal
            .as_deref()
            .filter(|t| snapshot.thermal_mode && !t.trim().is_empty());
        let base = match thermal {
            Some(t) => t,
            None if text.base.trim().is_empty() => {
                return ComposedText::layered(format!("[No text defined for {id}]"));
            }
            None => text.base.as_str(),
        };

        let applicable: Vec<_> = text.inserts.iter().filter(|i| i.applies(snapshot)).collect();
        let splice = |out: &mut String, position: InsertPosition| {
            for insert in applicable.iter().filter(|i| i.position == position) {
                out.push_str(position.separator());
                out.push_str(&insert.text);
            }
        };

        let mut out = base.to_string();
        splice(&mut out, InsertPosition::AfterBase);

        let lens_layer = text.lens_text(lens).or_else(|| lens.atmosphere());
        if let Some(layer) = lens_layer {
            out.push_str("\n\n");
            out.push_str(layer);
        }
        splice(&mut out, InsertPosition::AfterLens);
        splice(&mut out, InsertPosition::BeforeChoices);

        let mut composed = ComposedText::layered(out);
        composed.base_used = thermal.is_none();
        composed.thermal_used = thermal.is_some();
        composed.lens_used = lens_layer.map(|_| lens);
        composed.inserts_applied = applicable.iter().map(|i| i.id.clone()).collect();
        composed
    }

    /// Run the state-driven transforms in order: stress, doubt, sanity glitch.
    pub fn distort<R: Rng>(
        &self,
        text: &str,
        mental: &MentalReadings,
        rng: &mut R,
    ) -> (String, Vec<Distortion>) {
        let mut applied = Vec::new();
        let mut current = text.to_string();

        let next = stress_distort(&current, mental.stress, &self.distortion, rng);
        if next != current {
            applied.push(Distortion::Stress);
            current = next;
        }
        let next = doubt_filter(&current, mental.doubt, &self.distortion, rng);
        if next != current {
            applied.push(Distortion::Doubt);
            current = next;
        }
        let probability = self.thresholds.distortion_probability(mental.sanity);
        let next = sanity_glitch(&current, probability, rng);
        if next != current {
            applied.push(Distortion::SanityGlitch);
            current = next;
        }
        (current, applied)
    }

    /// Run `text` through the fracture gate only.
    pub fn fracture<R: Rng>(
        &self,
        text: &str,
        snapshot: &GameSnapshot,
        rng: &mut R,
    ) -> (String, Option<FractureKind>) {
        match fracture_gate(snapshot, &self.fracture, rng) {
            Some(kind) => (apply_fracture(text, kind, rng), Some(kind)),
            None => (text.to_string(), None),
        }
    }

    /// Compose a dialogue line. Dialogue is distorted but never fractures.
    pub fn compose_dialogue<R: Rng>(
        &self,
        speaker: &str,
        id: &str,
        text: &SceneText,
        lens: Lens,
        snapshot: &GameSnapshot,
        rng: &mut R,
    ) -> ComposedLine {
        let mut composed = self.layer(id, text, lens, snapshot);
        if composed.base_used || composed.thermal_used {
            let (distorted, distortions) = self.distort(&composed.full_text, &snapshot.mental, rng);
            composed.full_text = distorted;
            composed.distortions = distortions;
        }
        let speaker = if lens == Lens::Haunted && text.lens_text(Lens::Haunted).is_none() {
            format!("{speaker} (familiar)")
        } else {
            speaker.to_string()
        };
        ComposedLine {
            speaker,
            text: composed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::TextInsert;
    use crate::compose::fracture::FORCE_FLAG;
    use kv_core::Condition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn composer() -> TextComposer {
        TextComposer::new(&NarrativeConfig::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    fn stressed(stress: i32) -> GameSnapshot {
        GameSnapshot::default().with_mental(MentalReadings {
            stress,
            ..MentalReadings::default()
        })
    }

    #[test]
    fn calm_player_sees_base_text() {
        let text = SceneText::plain("The diner smells of burnt coffee.");
        let out = composer().compose("diner", &text, Lens::Neutral, &GameSnapshot::default(), &mut rng());
        assert_eq!(out.full_text, "The diner smells of burnt coffee.");
        assert!(out.base_used);
        assert!(!out.is_altered());
        assert_eq!(out.lens_used, None);
    }

    #[test]
    fn empty_base_reports_missing_text() {
        let out = composer().compose("cellar", &SceneText::default(), Lens::Believer, &stressed(100), &mut rng());
        assert_eq!(out.full_text, "[No text defined for cellar]");
        assert!(!out.base_used);
        assert!(out.distortions.is_empty());
    }

    #[test]
    fn thermal_replaces_base() {
        let text = SceneText::plain("A dark room.").with_thermal("A warm shape crouches in the corner.");
        let snapshot = GameSnapshot {
            thermal_mode: true,
            ..GameSnapshot::default()
        };
        let out = composer().layer("room", &text, Lens::Neutral, &snapshot);
        assert!(out.thermal_used);
        assert!(!out.base_used);
        assert!(out.full_text.starts_with("A warm shape"));
    }

    #[test]
    fn lens_atmosphere_fallback_and_authored_text() {
        let text = SceneText::plain("A diner.").with_lens(Lens::Skeptic, "Cheap neon. Nothing more.");
        let c = composer();
        let snap = GameSnapshot::default();
        let skeptic = c.layer("d", &text, Lens::Skeptic, &snap);
        assert_eq!(skeptic.full_text, "A diner.\n\nCheap neon. Nothing more.");
        assert_eq!(skeptic.lens_used, Some(Lens::Skeptic));
        let believer = c.layer("d", &text, Lens::Believer, &snap);
        assert_eq!(
            believer.full_text,
            "A diner.\n\nThe air feels charged with something unseen."
        );
    }

    #[test]
    fn inserts_land_in_position_order() {
        let text = SceneText::plain("Base.")
            .with_insert(TextInsert::new("end", "End.").at(InsertPosition::BeforeChoices))
            .with_insert(TextInsert::new("mid", "Mid."))
            .with_insert(TextInsert::new("first", "First.").at(InsertPosition::AfterBase))
            .with_insert(
                TextInsert::new("hidden", "Hidden.").when(Condition::has_tag("witness_seen")),
            );
        let out = composer().layer("s", &text, Lens::Haunted, &GameSnapshot::default());
        assert_eq!(
            out.full_text,
            "Base.\nFirst.\n\nYou've seen this before. Haven't you?\nMid.\n\nEnd."
        );
        assert_eq!(out.inserts_applied, vec!["end", "mid", "first"]);
    }

    #[test]
    fn stress_distortion_recorded() {
        let text = SceneText::plain("The quick brown fox jumps over the lazy dog.");
        let out = composer().compose("s", &text, Lens::Neutral, &stressed(90), &mut rng());
        assert_ne!(out.full_text, out.raw_text);
        assert_eq!(out.distortions.first(), Some(&Distortion::Stress));
        assert_eq!(out.raw_text, "The quick brown fox jumps over the lazy dog.");
    }

    #[test]
    fn forced_fracture_is_deterministic() {
        let text = SceneText::plain("The lighthouse is dark.");
        let snapshot = GameSnapshot::default().with_flag(FORCE_FLAG, "replacement");
        let out = composer().compose("lighthouse", &text, Lens::Neutral, &snapshot, &mut rng());
        assert_eq!(out.fracture, Some(FractureKind::Replacement));
        assert!(!out.full_text.contains("lighthouse"));
        assert_eq!(out.raw_text, "The lighthouse is dark.");
    }

    #[test]
    fn dialogue_never_fractures() {
        let text = SceneText::plain("I was home all night.");
        let snapshot = GameSnapshot::default().with_flag(FORCE_FLAG, true);
        let line = composer().compose_dialogue("Ingrid", "d1", &text, Lens::Haunted, &snapshot, &mut rng());
        assert_eq!(line.speaker, "Ingrid (familiar)");
        assert_eq!(line.text.fracture, None);
        assert!(line.text.full_text.starts_with("I was home all night."));
    }

    #[test]
    fn authored_haunted_line_keeps_speaker() {
        let text = SceneText::plain("Hello.").with_lens(Lens::Haunted, "Hello again.");
        let line = composer().compose_dialogue("Ingrid", "d1", &text, Lens::Haunted, &GameSnapshot::default(), &mut rng());
        assert_eq!(line.speaker, "Ingrid");
    }

    #[test]
    fn low_sanity_glitches() {
        let mental = MentalReadings {
            sanity: 10,
            ..MentalReadings::default()
        };
        let c = composer();
        let mut glitched = 0;
        for seed in 0..50 {
            let (out, applied) = c.distort("You see the door.", &mental, &mut StdRng::seed_from_u64(seed));
            if out == "You see the door." {
                assert!(applied.is_empty());
            } else {
                assert_eq!(applied, vec![Distortion::SanityGlitch]);
                glitched += 1;
            }
        }
        // Three eligible words at 50% each.
        assert!(glitched > 30, "glitched {glitched} of 50");
    }

    #[test]
    fn steady_sanity_never_glitches() {
        let (out, applied) = composer().distort("You see the door.", &MentalReadings::default(), &mut rng());
        assert_eq!(out, "You see the door.");
        assert!(applied.is_empty());
    }
}
