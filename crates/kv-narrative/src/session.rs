//! One player's investigation session.
//!
//! Wires a turn together: raw text goes through the command parser, each
//! intent is dispatched, the resulting narrative is composed against the
//! player's state, and any dialogue spoken this turn is screened by the liar
//! engine. Only the handful of verbs that touch engine state are dispatched
//! here. Everything else comes back as [`TurnEvent::Undispatched`] for the
//! host to handle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use kv_core::{EvidenceLog, FlagValue, GameSnapshot, SessionId};
use kv_mechanics::{FixedDice, SkillSheet};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compose::{ComposedLine, ComposedText, FractureHistory, Highlighter, Lens, TextComposer};
use crate::config::NarrativeConfig;
use crate::content::{ContentPack, Scene};
use crate::discovery::{DiscoveryTracker, Revealed};
use crate::error::{NarrativeError, NarrativeResult};
use crate::liar::{Interrupt, LiarEngine};
use crate::parser::{CommandParser, Intent, Unrecognized, verbs::canonical_verbs};
use crate::psyche::{PsychologicalState, RecoveryAction};

/// Scene id used when the content pack has no scenes at all.
const EMPTY_SCENE: &str = "void";

/// Per-session settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Engine tunables.
    pub narrative: NarrativeConfig,
    /// Seed for every random decision in the session.
    pub seed: u64,
    /// Starting skill levels by name.
    pub skills: BTreeMap<String, i32>,
    /// Interpretive lens.
    pub lens: Lens,
    /// Scripted faces for skill checks, cycled. Checks roll from the seeded
    /// RNG when empty.
    pub dice: Vec<u32>,
}

impl SessionConfig {
    /// Defaults with seed 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON session config.
    pub fn from_json(json: &str) -> NarrativeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.narrative.validate()?;
        Ok(config)
    }

    /// Set the seed (builder style).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set a starting skill (builder style).
    pub fn with_skill(mut self, name: &str, level: i32) -> Self {
        self.skills.insert(name.to_string(), level);
        self
    }

    /// Set the lens (builder style).
    pub fn with_lens(mut self, lens: Lens) -> Self {
        self.lens = lens;
        self
    }

    /// Script the faces skill checks roll (builder style).
    pub fn with_dice(mut self, faces: &[u32]) -> Self {
        self.dice = faces.to_vec();
        self
    }

    /// Replace the engine tunables (builder style).
    pub fn with_narrative(mut self, narrative: NarrativeConfig) -> Self {
        self.narrative = narrative;
        self
    }
}

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Scene description.
    Narration {
        /// Scene described.
        scene_id: String,
        /// Text as displayed, keywords emphasized.
        display: String,
        /// Composition details.
        composed: ComposedText,
    },
    /// A passive clue surfaced.
    Clue(Revealed),
    /// Evidence added to the log.
    EvidenceCollected {
        /// Evidence id.
        id: String,
        /// Its description.
        description: String,
    },
    /// A line of dialogue.
    Dialogue(ComposedLine),
    /// A caught lie.
    Interrupt(Interrupt),
    /// The player changed scenes.
    Moved {
        /// Scene left.
        from: String,
        /// Scene entered.
        to: String,
    },
    /// A list of things (inventory, verbs).
    Listing {
        /// Heading.
        title: String,
        /// Entries.
        items: Vec<String>,
    },
    /// A recovery action took effect.
    Recovery(String),
    /// A psychological feedback line.
    Feedback(String),
    /// A plain message.
    Notice(String),
    /// Input the parser did not understand.
    Unrecognized(Unrecognized),
    /// A recognized intent the session leaves to the host.
    Undispatched(Intent),
}

impl fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narration { display, .. } => write!(f, "{display}"),
            Self::Clue(clue) => write!(f, "[CLUE: {}] {}", clue.clue_id, clue.text),
            Self::EvidenceCollected { id, description } => {
                write!(f, "Collected {id}: {description}")
            }
            Self::Dialogue(line) => write!(f, "{}: \"{}\"", line.speaker, line.text.full_text),
            Self::Interrupt(interrupt) => write!(f, "{interrupt}"),
            Self::Moved { to, .. } => write!(f, "You make your way to {to}."),
            Self::Listing { title, items } => {
                write!(f, "{title}:")?;
                if items.is_empty() {
                    write!(f, " (none)")?;
                }
                for item in items {
                    write!(f, "\n  {item}")?;
                }
                Ok(())
            }
            Self::Recovery(line) | Self::Feedback(line) | Self::Notice(line) => write!(f, "{line}"),
            Self::Unrecognized(u) => match &u.suggestion {
                Some(verb) => write!(f, "You don't know how to '{}'. Did you mean '{verb}'?", u.fragment),
                None => write!(f, "You don't know how to '{}'.", u.fragment),
            },
            Self::Undispatched(intent) => write!(f, "[{intent}]"),
        }
    }
}

/// Everything one call to [`InvestigationSession::turn`] produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Raw input.
    pub input: String,
    /// Intents parsed from the input, in order.
    pub intents: Vec<Intent>,
    /// Events, in order.
    pub events: Vec<TurnEvent>,
}

impl TurnReport {
    /// Caught lies this turn.
    pub fn interrupts(&self) -> impl Iterator<Item = &Interrupt> {
        self.events.iter().filter_map(|e| match e {
            TurnEvent::Interrupt(i) => Some(i),
            _ => None,
        })
    }

    /// Whether nothing in the input was understood.
    pub fn understood_nothing(&self) -> bool {
        self.intents.is_empty()
    }
}

/// A single player's game state and the engine around it.
#[derive(Debug)]
pub struct InvestigationSession {
    id: SessionId,
    config: NarrativeConfig,
    content: ContentPack,
    parser: CommandParser,
    composer: TextComposer,
    liar: LiarEngine,
    highlighter: Highlighter,
    lens: Lens,
    psyche: PsychologicalState,
    evidence: EvidenceLog,
    skills: SkillSheet,
    flags: BTreeMap<String, FlagValue>,
    attributes: BTreeMap<String, i32>,
    inventory: BTreeSet<String>,
    equipment: BTreeSet<String>,
    trust: BTreeMap<String, i32>,
    attention: i32,
    theories: BTreeSet<String>,
    thermal_mode: bool,
    scene: String,
    discovery: DiscoveryTracker,
    fractures: FractureHistory,
    rng: StdRng,
    dice: Option<FixedDice>,
    journal: Vec<TurnReport>,
}

impl InvestigationSession {
    /// Start a session at the pack's starting scene.
    pub fn new(content: ContentPack, config: SessionConfig) -> NarrativeResult<Self> {
        config.narrative.validate()?;
        let mut skills = SkillSheet::new();
        for (name, level) in &config.skills {
            skills
                .set_by_name(name, *level)
                .map_err(|e| NarrativeError::InvalidConfig(e.to_string()))?;
        }
        let scene = match content.start_scene() {
            Some(id) => id.to_string(),
            None => {
                warn!("content pack has no scenes");
                EMPTY_SCENE.to_string()
            }
        };
        let mut session = Self {
            id: SessionId::new(),
            parser: CommandParser::new(&config.narrative),
            composer: TextComposer::new(&config.narrative),
            liar: LiarEngine::new(&config.narrative.liar)?,
            highlighter: Highlighter::new(content.keywords.as_slice())?,
            lens: config.lens,
            psyche: PsychologicalState::new(config.narrative.psyche),
            evidence: EvidenceLog::new(),
            skills,
            flags: BTreeMap::new(),
            attributes: BTreeMap::new(),
            inventory: BTreeSet::new(),
            equipment: BTreeSet::new(),
            trust: BTreeMap::new(),
            attention: 0,
            theories: BTreeSet::new(),
            thermal_mode: false,
            scene,
            discovery: DiscoveryTracker::new(),
            fractures: FractureHistory::new(),
            rng: StdRng::seed_from_u64(config.seed),
            dice: (!config.dice.is_empty()).then(|| FixedDice::new(config.dice.clone())),
            journal: Vec::new(),
            config: config.narrative,
            content,
        };
        session.enter_scene();
        info!(session = %session.id, scene = %session.scene, "session started");
        Ok(session)
    }

    /// Session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current scene id.
    pub fn scene_id(&self) -> &str {
        &self.scene
    }

    /// The engine tunables.
    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// The psychological state.
    pub fn psyche(&self) -> &PsychologicalState {
        &self.psyche
    }

    /// Mutable psychological state, for host-driven game events.
    pub fn psyche_mut(&mut self) -> &mut PsychologicalState {
        &mut self.psyche
    }

    /// The evidence log.
    pub fn evidence(&self) -> &EvidenceLog {
        &self.evidence
    }

    /// The skill sheet.
    pub fn skills(&self) -> &SkillSheet {
        &self.skills
    }

    /// The current lens.
    pub fn lens(&self) -> Lens {
        self.lens
    }

    /// Change the lens.
    pub fn set_lens(&mut self, lens: Lens) {
        self.lens = lens;
    }

    /// Set a flag.
    pub fn set_flag(&mut self, key: &str, value: impl Into<FlagValue>) {
        self.flags.insert(key.to_string(), value.into());
    }

    /// Clear a flag.
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }

    /// Adjust the attention meter, floored at 0.
    pub fn add_attention(&mut self, delta: i32) -> i32 {
        self.attention = self.attention.saturating_add(delta).max(0);
        self.attention
    }

    /// Turn thermal vision on or off.
    pub fn set_thermal_mode(&mut self, on: bool) {
        self.thermal_mode = on;
    }

    /// Adopt a theory.
    pub fn adopt_theory(&mut self, theory: &str) {
        self.theories.insert(theory.to_string());
    }

    /// Set an attribute level.
    pub fn set_attribute(&mut self, name: &str, level: i32) {
        self.attributes.insert(name.to_string(), level);
    }

    /// Adjust trust toward a character. Returns the new value.
    pub fn adjust_trust(&mut self, who: &str, delta: i32) -> i32 {
        let trust = self.trust.entry(who.to_lowercase()).or_insert(0);
        *trust = trust.saturating_add(delta);
        *trust
    }

    /// Put an item in the inventory.
    pub fn add_item(&mut self, item: &str) {
        self.inventory.insert(item.to_string());
    }

    /// Equip a carried item. Returns false if it is not carried.
    pub fn equip(&mut self, item: &str) -> bool {
        if !self.inventory.contains(item) {
            return false;
        }
        self.equipment.insert(item.to_string());
        true
    }

    /// Passive clue tracker.
    pub fn discovery(&self) -> &DiscoveryTracker {
        &self.discovery
    }

    /// Fractures fired so far.
    pub fn fractures(&self) -> &FractureHistory {
        &self.fractures
    }

    /// Every turn so far.
    pub fn journal(&self) -> &[TurnReport] {
        &self.journal
    }

    /// Read-only view of the state for condition evaluation.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            flags: self.flags.clone(),
            skills: self.skills.named_levels(),
            attributes: self.attributes.clone(),
            trust: self.trust.clone(),
            attention: self.attention,
            inventory: self.inventory.clone(),
            equipment: self.equipment.clone(),
            evidence_tags: self.evidence.tags(),
            theories: self.theories.clone(),
            thermal_mode: self.thermal_mode,
            mental: self.psyche.readings(),
        }
    }

    /// Describe the current scene without taking a turn.
    pub fn describe(&mut self) -> TurnEvent {
        let scene = self.current_scene();
        self.narrate(&scene)
    }

    /// Run one turn.
    pub fn turn(&mut self, input: &str) -> TurnReport {
        let parsed = self.parser.parse_detailed(input);
        let mut events = Vec::new();
        let mut unrecognized = parsed.unrecognized.iter().peekable();
        let mut intents = parsed.intents.iter();
        for clause in 0..parsed.intents.len() + parsed.unrecognized.len() {
            if let Some(unknown) = unrecognized.next_if(|u| u.clause == clause) {
                events.push(TurnEvent::Unrecognized(unknown.clone()));
            } else if let Some(intent) = intents.next() {
                debug!(intent = %intent, "dispatch");
                self.dispatch(intent, &mut events);
            }
        }
        events.extend(self.psyche.take_feedback().into_iter().map(TurnEvent::Feedback));

        let report = TurnReport {
            turn: u32::try_from(self.journal.len() + 1).unwrap_or(u32::MAX),
            input: input.to_string(),
            intents: parsed.intents,
            events,
        };
        self.journal.push(report.clone());
        report
    }

    fn dispatch(&mut self, intent: &Intent, events: &mut Vec<TurnEvent>) {
        let target = intent.target.as_deref();
        match intent.verb.as_str() {
            "look" | "search" => self.look(target, intent.verb == "search", events),
            "take" => self.take(target, events),
            "talk" => self.talk(target, events),
            "go" => self.go(target, events),
            "inventory" => events.push(TurnEvent::Listing {
                title: "Evidence".into(),
                items: self
                    .evidence
                    .iter()
                    .map(|e| format!("{} [{}]: {}", e.id, e.category, e.description))
                    .collect(),
            }),
            "help" => events.push(TurnEvent::Listing {
                title: "Commands".into(),
                items: canonical_verbs().map(str::to_string).collect(),
            }),
            "rest" => events.push(TurnEvent::Recovery(
                self.psyche.recover(RecoveryAction::Grounding).to_string(),
            )),
            "treat" => events.push(TurnEvent::Recovery(
                self.psyche.recover(RecoveryAction::DrinkWater).to_string(),
            )),
            _ => events.push(TurnEvent::Undispatched(intent.clone())),
        }
    }

    fn look(&mut self, target: Option<&str>, search: bool, events: &mut Vec<TurnEvent>) {
        let scene = self.current_scene();
        if let Some(target) = target
            && let Some(item) = scene.find_evidence(target)
        {
            events.push(TurnEvent::Notice(item.description.clone()));
            return;
        }
        events.push(self.narrate(&scene));
        if search || target.is_none() {
            self.reveal_clues(&scene, events);
        }
    }

    fn take(&mut self, target: Option<&str>, events: &mut Vec<TurnEvent>) {
        let Some(target) = target else {
            events.push(TurnEvent::Notice("Take what?".into()));
            return;
        };
        let scene = self.current_scene();
        let Some(item) = scene.find_evidence(target) else {
            events.push(TurnEvent::Notice(format!("There is no {target} here.")));
            return;
        };
        if self.evidence.contains(&item.id) {
            events.push(TurnEvent::Notice("You already have that.".into()));
            return;
        }
        let mut item = item.clone();
        item.location.get_or_insert_with(|| scene.id.clone());
        let event = TurnEvent::EvidenceCollected {
            id: item.id.clone(),
            description: item.description.clone(),
        };
        if let Err(e) = self.evidence.add(item) {
            warn!(error = %e, "evidence not collected");
            return;
        }
        events.push(event);
    }

    fn talk(&mut self, target: Option<&str>, events: &mut Vec<TurnEvent>) {
        let Some(target) = target else {
            events.push(TurnEvent::Notice("Talk to whom?".into()));
            return;
        };
        let scene = self.current_scene();
        let snapshot = self.snapshot();
        let lines: Vec<_> = scene
            .lines_for(target)
            .filter(|line| line.condition.evaluate(&snapshot))
            .collect();
        if lines.is_empty() {
            events.push(TurnEvent::Notice(format!("{target} has nothing to say.")));
            return;
        }
        let level = self.skills.level(self.liar.skill());
        for line in lines {
            let composed = self.composer.compose_dialogue(
                &line.speaker,
                &line.id,
                &line.text,
                self.lens,
                &snapshot,
                &mut self.rng,
            );
            let spoken = composed.text.raw_text.clone();
            events.push(TurnEvent::Dialogue(composed));
            let interrupts = match self.dice.as_mut() {
                Some(dice) => self.liar.check_contradictions(&spoken, &self.evidence, level, dice),
                None => self
                    .liar
                    .check_contradictions(&spoken, &self.evidence, level, &mut self.rng),
            };
            events.extend(interrupts.into_iter().map(TurnEvent::Interrupt));
        }
    }

    fn go(&mut self, target: Option<&str>, events: &mut Vec<TurnEvent>) {
        let Some(target) = target else {
            events.push(TurnEvent::Notice("Go where?".into()));
            return;
        };
        let scene = self.current_scene();
        let destination = scene
            .exit(target)
            .or_else(|| scene.exits.values().find(|to| to.eq_ignore_ascii_case(target)).map(String::as_str));
        let Some(destination) = destination else {
            events.push(TurnEvent::Notice("You can't go that way.".into()));
            return;
        };
        let from = std::mem::replace(&mut self.scene, destination.to_string());
        self.enter_scene();
        events.push(TurnEvent::Moved {
            from,
            to: self.scene.clone(),
        });
        let arrived = self.current_scene();
        events.push(self.narrate(&arrived));
        self.reveal_clues(&arrived, events);
    }

    fn enter_scene(&mut self) {
        let scene = self.current_scene();
        if scene.synonyms.is_empty() {
            self.parser.clear_scene_synonyms();
        } else {
            self.parser.set_scene_synonyms(&scene.synonyms);
        }
    }

    fn current_scene(&self) -> Scene {
        self.content.scene_or_placeholder(&self.scene).into_owned()
    }

    fn narrate(&mut self, scene: &Scene) -> TurnEvent {
        let snapshot = self.snapshot();
        let composed = self
            .composer
            .compose(&scene.id, &scene.text, self.lens, &snapshot, &mut self.rng);
        if let Some(kind) = composed.fracture {
            self.fractures.record(kind, &scene.id);
        }
        TurnEvent::Narration {
            scene_id: scene.id.clone(),
            display: self.highlighter.highlight(&composed.full_text),
            composed,
        }
    }

    fn reveal_clues(&mut self, scene: &Scene, events: &mut Vec<TurnEvent>) {
        let snapshot = self.snapshot();
        events.extend(
            self.discovery
                .evaluate(&scene.passive_clues, &snapshot)
                .into_iter()
                .map(TurnEvent::Clue),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::FORCE_FLAG;
    use crate::psyche::Dimension;

    const PACK: &str = r#"{
        "start": "diner",
        "keywords": ["neon"],
        "scenes": [
            {
                "id": "diner",
                "text": "Neon hums over empty booths.",
                "synonyms": {"objects": {"ingrid": ["waitress"]}},
                "passive_clues": [
                    {"clue_id": "calendar", "text": "The calendar stops at October."}
                ],
                "evidence": [
                    {"id": "witness_01", "description": "A trucker saw a tall man by the pumps.",
                     "category": "testimony", "tags": ["witness_seen"]}
                ],
                "dialogue": [
                    {"id": "alibi", "speaker": "ingrid",
                     "text": "I was alone. No one else was around that night."}
                ],
                "exits": {"north": "lighthouse"}
            },
            {"id": "lighthouse", "text": "The lamp is dark.", "exits": {"south": "diner"}}
        ]
    }"#;

    fn session() -> InvestigationSession {
        let content = ContentPack::from_json(PACK).unwrap();
        let config = SessionConfig::new().with_seed(11).with_skill("Skepticism", 6);
        InvestigationSession::new(content, config).unwrap()
    }

    #[test]
    fn look_describes_and_reveals_once() {
        let mut s = session();
        let report = s.turn("look");
        assert_eq!(report.turn, 1);
        assert!(matches!(
            &report.events[0],
            TurnEvent::Narration { display, .. } if display.starts_with("**Neon** hums")
        ));
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Clue(_))));
        let again = s.turn("look");
        assert!(!again.events.iter().any(|e| matches!(e, TurnEvent::Clue(_))));
    }

    #[test]
    fn take_then_talk_catches_lie() {
        let content = ContentPack::from_json(PACK).unwrap();
        let config = SessionConfig::new()
            .with_skill("Skepticism", 3)
            .with_dice(&[6, 5]);
        let mut s = InvestigationSession::new(content, config).unwrap();
        let report = s.turn("take witness_01 then talk to waitress");
        assert_eq!(report.intents.len(), 2);
        assert!(s.evidence().contains("witness_01"));
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Dialogue(_))));
        let interrupts: Vec<_> = report.interrupts().collect();
        assert_eq!(interrupts.len(), 1);
        assert_eq!(interrupts[0].evidence_id, "witness_01");
        assert_eq!(interrupts[0].pattern_id, "witness_seen");
        assert_eq!(interrupts[0].skill, "Skepticism");
        assert_eq!(interrupts[0].check.total, 14);
    }

    #[test]
    fn failed_skepticism_stays_silent() {
        let content = ContentPack::from_json(PACK).unwrap();
        let config = SessionConfig::new()
            .with_skill("Skepticism", 3)
            .with_dice(&[1, 2]);
        let mut s = InvestigationSession::new(content, config).unwrap();
        s.turn("take witness_01");
        let report = s.turn("talk to ingrid");
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Dialogue(_))));
        assert_eq!(report.interrupts().count(), 0);
    }

    #[test]
    fn talk_without_evidence_is_silent() {
        let mut s = session();
        let report = s.turn("talk to ingrid");
        assert_eq!(report.interrupts().count(), 0);
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Dialogue(_))));
    }

    #[test]
    fn go_moves_and_swaps_synonyms() {
        let mut s = session();
        let report = s.turn("go north");
        assert_eq!(s.scene_id(), "lighthouse");
        assert!(matches!(&report.events[0], TurnEvent::Moved { from, .. } if from == "diner"));
        let back = s.turn("talk to waitress");
        assert!(matches!(&back.events[0], TurnEvent::Notice(n) if n.contains("waitress")));
        assert!(matches!(&s.turn("go west").events[0], TurnEvent::Notice(_)));
    }

    #[test]
    fn unknown_and_host_verbs() {
        let mut s = session();
        let report = s.turn("dance then photograph booth");
        assert!(matches!(&report.events[0], TurnEvent::Unrecognized(_)));
        assert!(matches!(
            &report.events[1],
            TurnEvent::Undispatched(intent) if intent.verb == "photograph"
        ));
    }

    #[test]
    fn events_follow_input_order() {
        let mut s = session();
        let report = s.turn("look then dance");
        assert!(matches!(&report.events[0], TurnEvent::Narration { .. }));
        assert!(matches!(
            report.events.last(),
            Some(TurnEvent::Unrecognized(u)) if u.fragment == "dance"
        ));
    }

    #[test]
    fn rest_recovers_and_feedback_flows() {
        let mut s = session();
        s.psyche_mut().modify(Dimension::Sanity, -40, "the tape");
        let report = s.turn("rest");
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Recovery(_))));
        assert_eq!(s.psyche().sanity(), 70);
        assert!(report.events.iter().any(|e| matches!(e, TurnEvent::Feedback(_))));
    }

    #[test]
    fn forced_fracture_recorded() {
        let mut s = session();
        s.set_flag(FORCE_FLAG, "timestamp");
        s.turn("look");
        assert_eq!(s.fractures().len(), 1);
        assert_eq!(s.fractures().last().unwrap().scene_id, "diner");
    }

    #[test]
    fn journal_keeps_every_turn() {
        let mut s = session();
        s.turn("inventory");
        s.turn("help");
        assert_eq!(s.journal().len(), 2);
        assert!(matches!(
            &s.journal()[1].events[0],
            TurnEvent::Listing { title, items } if title == "Commands" && items.len() == 27
        ));
    }

    #[test]
    fn unknown_starting_skill_rejected() {
        let config = SessionConfig::new().with_skill("Juggling", 2);
        assert!(InvestigationSession::new(ContentPack::default(), config).is_err());
    }

    #[test]
    fn empty_pack_degrades() {
        let mut s = InvestigationSession::new(ContentPack::default(), SessionConfig::new()).unwrap();
        assert_eq!(s.scene_id(), "void");
        let event = s.describe();
        assert_eq!(event.to_string(), "[No text defined for void]");
    }
}
