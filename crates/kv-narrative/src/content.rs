//! Content packs: scenes, their layered text, clues, evidence and dialogue.
//!
//! Conditions may be written as condition-language strings or as tagged
//! JSON trees. Strings are compiled once, while loading, so a malformed
//! condition fails the load with its location instead of surfacing mid-game.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use kv_core::{Condition, Evidence};
use kv_dsl::diagnostics::summarize;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::compose::SceneText;
use crate::config::validate_synonyms;
use crate::discovery::PassiveClue;
use crate::error::{NarrativeError, NarrativeResult};
use crate::parser::SceneSynonyms;

/// One line a character can say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Line id.
    pub id: String,
    /// Who says it.
    pub speaker: String,
    /// What is said.
    #[serde(default)]
    pub text: SceneText,
    /// When the line is available.
    #[serde(default)]
    pub condition: Condition,
}

/// A place the player can be.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene id.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Layered description.
    #[serde(default)]
    pub text: SceneText,
    /// Scene-scoped synonym layer.
    #[serde(default, skip_serializing_if = "SceneSynonyms::is_empty")]
    pub synonyms: SceneSynonyms,
    /// Clues noticed without asking.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passive_clues: Vec<PassiveClue>,
    /// Evidence that can be taken here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
    /// Dialogue available here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialogue: Vec<DialogueLine>,
    /// Direction or target to scene id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exits: BTreeMap<String, String>,
}

impl Scene {
    /// Stand-in for a scene the pack does not contain.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// Evidence here matching `target`.
    ///
    /// An exact id wins over a tag, which wins over whole words of a
    /// description.
    pub fn find_evidence(&self, target: &str) -> Option<&Evidence> {
        let target = target.trim().to_lowercase();
        let wanted = words(&target);
        if wanted.is_empty() {
            return None;
        }
        self.evidence
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(&target))
            .or_else(|| self.evidence.iter().find(|e| e.tags.contains(&target)))
            .or_else(|| {
                self.evidence.iter().find(|e| {
                    words(&e.description)
                        .windows(wanted.len())
                        .any(|window| window == wanted.as_slice())
                })
            })
    }

    /// Dialogue lines spoken by `speaker` (case-insensitive), in order.
    pub fn lines_for<'a>(&'a self, speaker: &'a str) -> impl Iterator<Item = &'a DialogueLine> {
        self.dialogue
            .iter()
            .filter(move |line| line.speaker.eq_ignore_ascii_case(speaker))
    }

    /// The scene an exit leads to.
    pub fn exit(&self, direction: &str) -> Option<&str> {
        self.exits
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(direction.trim()))
            .map(|(_, to)| to.as_str())
    }
}

/// A loaded content pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPack {
    /// Scene the player starts in. Defaults to the first scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Keywords emphasized on display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// All scenes.
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl ContentPack {
    /// Parse, compile condition strings, and validate.
    pub fn from_json(json: &str) -> NarrativeResult<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        prepare_pack(&mut value)?;
        let pack: Self = serde_json::from_value(value)?;
        pack.validate()?;
        debug!(scenes = pack.scenes.len(), "content pack loaded");
        Ok(pack)
    }

    /// Check ids are unique, scene synonyms are unambiguous and every
    /// reference resolves.
    pub fn validate(&self) -> NarrativeResult<()> {
        let mut ids = HashSet::new();
        for scene in &self.scenes {
            if scene.id.trim().is_empty() {
                return Err(NarrativeError::InvalidConfig("scene with empty id".into()));
            }
            if !ids.insert(scene.id.as_str()) {
                return Err(NarrativeError::InvalidConfig(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
            let mut evidence = HashSet::new();
            for item in &scene.evidence {
                if !evidence.insert(item.id.as_str()) {
                    return Err(NarrativeError::InvalidConfig(format!(
                        "scene '{}' lists evidence '{}' twice",
                        scene.id, item.id
                    )));
                }
            }
            validate_synonyms(&format!("scene '{}' verb", scene.id), &scene.synonyms.verbs)?;
            validate_synonyms(&format!("scene '{}' object", scene.id), &scene.synonyms.objects)?;
        }
        for scene in &self.scenes {
            for target in scene.exits.values() {
                if !ids.contains(target.as_str()) {
                    return Err(NarrativeError::UnknownScene(format!(
                        "{target} (exit from '{}')",
                        scene.id
                    )));
                }
            }
        }
        if let Some(start) = &self.start
            && !ids.contains(start.as_str())
        {
            return Err(NarrativeError::UnknownScene(start.clone()));
        }
        Ok(())
    }

    /// Look up a scene.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Look up a scene, degrading to an empty placeholder when missing.
    pub fn scene_or_placeholder(&self, id: &str) -> Cow<'_, Scene> {
        match self.scene(id) {
            Some(scene) => Cow::Borrowed(scene),
            None => {
                warn!(scene = id, "missing scene, using placeholder");
                Cow::Owned(Scene::placeholder(id))
            }
        }
    }

    /// The starting scene id, if the pack has any scenes.
    pub fn start_scene(&self) -> Option<&str> {
        self.start
            .as_deref()
            .or_else(|| self.scenes.first().map(|s| s.id.as_str()))
    }
}

fn prepare_pack(pack: &mut Value) -> NarrativeResult<()> {
    let Some(scenes) = pack.get_mut("scenes").and_then(Value::as_array_mut) else {
        return Ok(());
    };
    for scene in scenes {
        let id = scene
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        let context = format!("scene '{id}'");
        if let Some(text) = scene.get_mut("text") {
            prepare_text(text, &context)?;
        }
        for clue in array_mut(scene, "passive_clues") {
            let clue_id = clue.get("clue_id").and_then(Value::as_str).unwrap_or("?").to_string();
            compile_field(clue, "visible_when", &format!("{context} clue '{clue_id}'"))?;
        }
        for line in array_mut(scene, "dialogue") {
            let line_id = line.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
            let line_context = format!("{context} line '{line_id}'");
            if let Some(text) = line.get_mut("text") {
                prepare_text(text, &line_context)?;
            }
            compile_field(line, "condition", &line_context)?;
        }
    }
    Ok(())
}

/// Accept `"text": "..."` as shorthand for `{"base": "..."}`, and compile
/// insert conditions.
fn prepare_text(text: &mut Value, context: &str) -> NarrativeResult<()> {
    if let Value::String(base) = text {
        let mut object = Map::new();
        object.insert("base".into(), Value::String(std::mem::take(base)));
        *text = Value::Object(object);
    }
    for insert in array_mut(text, "inserts") {
        let insert_id = insert.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
        compile_field(insert, "condition", &format!("{context} insert '{insert_id}'"))?;
    }
    Ok(())
}

fn compile_field(object: &mut Value, key: &str, context: &str) -> NarrativeResult<()> {
    let Some(Value::String(source)) = object.get(key) else {
        return Ok(());
    };
    let condition = kv_dsl::parse_condition(source).map_err(|diagnostics| {
        NarrativeError::MalformedCondition {
            context: context.to_string(),
            message: summarize(source, &diagnostics),
        }
    })?;
    if let Some(map) = object.as_object_mut() {
        map.insert(key.to_string(), serde_json::to_value(condition)?);
    }
    Ok(())
}

fn array_mut<'a>(value: &'a mut Value, key: &str) -> impl Iterator<Item = &'a mut Value> {
    value
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
}

/// Lowercase words, split on anything that is not alphanumeric or `_`.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
