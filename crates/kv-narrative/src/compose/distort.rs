//! State-driven text transforms.
//!
//! Each transform is a pure function of its input text, a magnitude, and an
//! injected RNG. Below its threshold a transform returns the input
//! unchanged. Doubt and the sanity glitch roll every eligible word on its
//! own. Stress distortion alone guarantees a visible change above its
//! threshold.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::DistortionConfig;

/// Which transform touched the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distortion {
    /// Word corruption from stress.
    Stress,
    /// Hedged certainty from doubt.
    Doubt,
    /// Legacy word swaps from low sanity.
    SanityGlitch,
}

const STRESS_SUBSTITUTIONS: &[(&str, &[&str])] = &[
    ("door", &["mouth", "barrier", "lid"]),
    ("window", &["eye", "lens", "hole"]),
    ("light", &["glare", "radiation", "burning gaze"]),
    ("shadow", &["void", "stain", "living darkness"]),
    ("tree", &["claw", "spire", "reaching limb"]),
    ("sky", &["lid", "abyss", "ceiling"]),
    ("wall", &["skin", "membrane", "barrier"]),
    ("floor", &["flesh", "ground", "depths"]),
    ("hope", &["delusion", "lie", "trap"]),
    ("memory", &["scar", "ghost", "tape"]),
    ("friend", &["stranger", "agent", "actor"]),
    ("enemy", &["truth", "reflection", "self"]),
];

const INTRUSIONS: &[&str] = &[
    "THEY ARE WATCHING YOU.",
    "IT IS INSIDE THE WALLS.",
    "DON'T TRUST THE MIRROR.",
    "YOU ARE NOT ALONE.",
    "WAKE UP.",
    "THIS IS NOT REAL.",
];

const CERTAINTY_HEDGES: &[(&str, &str)] = &[
    ("definitely", "maybe"),
    ("certainly", "perhaps"),
    ("clearly", "hazily"),
    ("obviously", "possibly"),
    ("undoubtedly", "probably"),
    ("surely", "maybe"),
    ("absolutely", "somewhat"),
    ("always", "usually"),
    ("never", "rarely"),
    ("know", "think"),
    ("saw", "think I saw"),
    ("certain", "unsure"),
    ("sure", "unsure"),
];

/// Adverbs that may simply vanish instead of being hedged.
const DROPPABLE: &[&str] = &["definitely", "certainly", "clearly", "obviously", "absolutely"];

const SANITY_GLITCHES: &[(&str, &[&str])] = &[
    ("is", &["was", "is not", "could be"]),
    ("you", &["they", "it", "we"]),
    ("see", &["feel", "hear", "imagine"]),
    ("door", &["maw", "exit", "trap"]),
    ("friend", &["liar", "spy", "stranger"]),
    ("truth", &["lie", "fabrication", "story"]),
];

/// Doubt at or above this appends a trailing question.
const DOUBT_ECHO_LEVEL: i32 = 80;

/// Corrupt words in proportion to stress.
pub fn stress_distort<R: Rng>(text: &str, stress: i32, config: &DistortionConfig, rng: &mut R) -> String {
    if stress <= config.stress_threshold {
        return text.to_string();
    }
    let intensity = f64::from(stress.min(100)) / 100.0;
    let rate = config.word_rate * intensity;

    let mut words = Words::split(text);
    let indices = words.word_indices();
    if indices.is_empty() {
        return text.to_string();
    }
    let mut changed = false;
    for &i in &indices {
        if rng.random::<f64>() < rate {
            changed |= corrupt_word(&mut words, i, rng);
        }
    }
    if !changed && let Some(&i) = indices.choose(rng) {
        words.stutter(i);
    }
    let mut out = words.join();
    if stress >= 75
        && rng.random::<f64>() < (intensity - 0.5)
        && let Some(line) = INTRUSIONS.choose(rng)
    {
        out = format!("{out} {line}");
    }
    out
}

/// Hedge or drop certainty markers in proportion to doubt.
pub fn doubt_filter<R: Rng>(text: &str, doubt: i32, config: &DistortionConfig, rng: &mut R) -> String {
    if doubt <= config.doubt_threshold {
        return text.to_string();
    }
    let chance = f64::from(doubt.min(100)) / 100.0;
    let mut words = Words::split(text);
    let markers: Vec<usize> = words
        .word_indices()
        .into_iter()
        .filter(|&i| hedge_for(words.core(i)).is_some())
        .collect();

    for &i in &markers {
        if rng.random::<f64>() < chance {
            hedge_word(&mut words, i, rng);
        }
    }
    let mut out = words.join();
    if doubt >= DOUBT_ECHO_LEVEL && !out.trim().is_empty() {
        out = format!("{} ...or was it?", out.trim_end());
    }
    out
}

/// Swap glitch-map words with probability `probability` each.
pub fn sanity_glitch<R: Rng>(text: &str, probability: f64, rng: &mut R) -> String {
    if probability <= 0.0 {
        return text.to_string();
    }
    let mut words = Words::split(text);
    let candidates: Vec<usize> = words
        .word_indices()
        .into_iter()
        .filter(|&i| lookup(SANITY_GLITCHES, words.core(i)).is_some())
        .collect();
    for &i in &candidates {
        if rng.random::<f64>() < probability {
            substitute(&mut words, i, SANITY_GLITCHES, rng);
        }
    }
    words.join()
}

fn corrupt_word<R: Rng>(words: &mut Words, i: usize, rng: &mut R) -> bool {
    if lookup(STRESS_SUBSTITUTIONS, words.core(i)).is_some() {
        substitute(words, i, STRESS_SUBSTITUTIONS, rng)
    } else {
        words.stutter(i);
        true
    }
}

fn substitute<R: Rng>(words: &mut Words, i: usize, table: &[(&str, &[&str])], rng: &mut R) -> bool {
    let core = words.core(i).to_string();
    let Some(options) = lookup(table, &core) else {
        return false;
    };
    let Some(choice) = options.choose(rng) else {
        return false;
    };
    words.replace_core(i, &match_case(choice, &core));
    true
}

fn hedge_word<R: Rng>(words: &mut Words, i: usize, rng: &mut R) {
    let core = words.core(i).to_string();
    let Some(hedge) = hedge_for(&core) else {
        return;
    };
    let lower = core.to_lowercase();
    let starts_upper = core.chars().next().is_some_and(char::is_uppercase);
    if DROPPABLE.contains(&lower.as_str()) && !starts_upper && rng.random_bool(0.5) {
        words.drop_word(i);
    } else {
        words.replace_core(i, &match_case(hedge, &core));
    }
}

fn hedge_for(core: &str) -> Option<&'static str> {
    let lower = core.to_lowercase();
    CERTAINTY_HEDGES
        .iter()
        .find(|(marker, _)| *marker == lower)
        .map(|(_, hedge)| *hedge)
}

fn lookup<'a>(table: &'a [(&str, &[&str])], core: &str) -> Option<&'a [&'a str]> {
    let lower = core.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, options)| *options)
}

/// Apply the case shape of `original` to `replacement`.
pub(crate) fn match_case(replacement: &str, original: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

/// Text split into alternating whitespace and word pieces.
///
/// Joining the pieces reproduces the input exactly, so newlines and
/// paragraph breaks survive every transform.
#[derive(Debug)]
pub(crate) struct Words {
    pieces: Vec<String>,
}

impl Words {
    pub(crate) fn split(text: &str) -> Self {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut prev: Option<bool> = None;
        for (i, c) in text.char_indices() {
            let ws = c.is_whitespace();
            if let Some(p) = prev
                && p != ws
            {
                pieces.push(text[start..i].to_string());
                start = i;
            }
            prev = Some(ws);
        }
        if start < text.len() {
            pieces.push(text[start..].to_string());
        }
        Self { pieces }
    }

    pub(crate) fn word_indices(&self) -> Vec<usize> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.chars().next().is_some_and(|c| !c.is_whitespace()))
            .map(|(i, _)| i)
            .collect()
    }

    fn affixes(&self, i: usize) -> (usize, usize) {
        let piece = &self.pieces[i];
        let is_edge = |c: char| c.is_ascii_punctuation() && c != '\'';
        let start = piece.len() - piece.trim_start_matches(is_edge).len();
        let end = piece.trim_end_matches(is_edge).len().max(start);
        (start, end)
    }

    pub(crate) fn core(&self, i: usize) -> &str {
        let (start, end) = self.affixes(i);
        &self.pieces[i][start..end]
    }

    fn replace_core(&mut self, i: usize, replacement: &str) {
        let (start, end) = self.affixes(i);
        let piece = &self.pieces[i];
        self.pieces[i] = format!("{}{replacement}{}", &piece[..start], &piece[end..]);
    }

    fn stutter(&mut self, i: usize) {
        let core = self.core(i).to_string();
        if core.is_empty() {
            let piece = self.pieces[i].clone();
            self.pieces[i] = format!("{piece} {piece}");
            return;
        }
        let first: String = core.chars().take(1).collect();
        self.replace_core(i, &format!("{first}-{core}"));
    }

    fn drop_word(&mut self, i: usize) {
        let (start, end) = self.affixes(i);
        let piece = &self.pieces[i];
        let remainder = format!("{}{}", &piece[..start], &piece[end..]);
        if remainder.is_empty() {
            self.pieces[i].clear();
            if let Some(next) = self.pieces.get_mut(i + 1) {
                next.clear();
            }
        } else {
            self.pieces[i] = remainder;
        }
    }

    pub(crate) fn join(&self) -> String {
        self.pieces.concat()
    }
}
