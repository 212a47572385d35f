//! The canonical verb vocabulary.

use std::collections::BTreeMap;

/// Every canonical verb with its default surface forms.
///
/// The canonical verb itself always matches, so it is not repeated here.
pub const DEFAULT_VERBS: &[(&str, &[&str])] = &[
    ("look", &["examine", "inspect", "see", "check", "observe", "x", "l", "look at"]),
    ("take", &["grab", "pick up", "get", "seize", "collect", "bag", "gather", "pickup"]),
    ("use", &["operate", "trigger", "activate", "shine", "turn on"]),
    ("talk", &["ask", "interrogate", "question", "speak", "query", "talk to"]),
    ("connect", &["link", "tie", "match", "correlate", "compare"]),
    ("go", &["walk", "move", "travel", "enter"]),
    ("switch", &["toggle"]),
    ("help", &["?", "commands"]),
    ("inventory", &["inv", "i", "items", "pockets", "evidence"]),
    ("search", &["scan", "look around", "survey"]),
    ("photograph", &["photo", "snap", "pic", "capture"]),
    ("equip", &["wear", "hold", "draw", "wield"]),
    ("unequip", &["remove", "stow", "sheathe", "holster"]),
    ("analyze", &["study", "research", "test", "investigate"]),
    ("combine", &["merge", "mix", "use with"]),
    ("fight", &["attack", "strike", "hit", "shoot"]),
    ("dodge", &["evade", "duck", "weave"]),
    ("flee", &["run", "escape", "retreat"]),
    ("intimidate", &["threaten", "menace"]),
    ("reason", &["persuade", "convince", "negotiate"]),
    ("injuries", &["wounds", "damage", "health"]),
    ("treat", &["heal", "bandage", "medicate"]),
    ("rest", &["sleep", "recover"]),
    ("sprint", &["dash", "bolt"]),
    ("vault", &["jump", "leap", "climb"]),
    ("hide", &["conceal"]),
    ("surrender", &["give up", "yield"]),
];

/// The default verb table as owned data, for [`NarrativeConfig`](crate::NarrativeConfig).
pub fn default_verb_table() -> BTreeMap<String, Vec<String>> {
    DEFAULT_VERBS
        .iter()
        .map(|(verb, synonyms)| {
            (
                (*verb).to_string(),
                synonyms.iter().map(|s| (*s).to_string()).collect(),
            )
        })
        .collect()
}

/// Canonical verb names, in table order.
pub fn canonical_verbs() -> impl Iterator<Item = &'static str> {
    DEFAULT_VERBS.iter().map(|(verb, _)| *verb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn table_has_every_verb() {
        let table = default_verb_table();
        assert_eq!(table.len(), 27);
        assert!(table["take"].contains(&"pick up".to_string()));
        assert_eq!(canonical_verbs().next(), Some("look"));
    }

    #[test]
    fn no_surface_claimed_twice() {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for (verb, synonyms) in DEFAULT_VERBS {
            for surface in synonyms.iter().chain(std::iter::once(verb)) {
                if let Some(prev) = owner.insert(surface, verb) {
                    assert_eq!(prev, *verb, "'{surface}' claimed twice");
                }
            }
        }
    }
}
