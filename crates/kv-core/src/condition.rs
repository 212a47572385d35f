//! Condition evaluation for conditional content.
//!
//! A [`Condition`] is a closed tree: comparisons and membership tests at the
//! leaves, `not`/`and`/`or` above them. Evaluation is a pure function of a
//! [`GameSnapshot`]. The `Display` impl prints the textual condition syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flag::FlagValue;
use crate::snapshot::GameSnapshot;

/// A numeric quantity a condition can compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// Effective level of a named skill.
    Skill(String),
    /// Level of a named attribute.
    Attribute(String),
    /// Trust toward a character.
    Trust(String),
    /// Attention drawn by the player.
    Attention,
    /// Current sanity.
    Sanity,
    /// Current stress.
    Stress,
    /// Current doubt.
    Doubt,
    /// Current obsession.
    Obsession,
    /// Total paranoia magnitude.
    Paranoia,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(n) => write!(f, "skill({})", Name(n)),
            Self::Attribute(n) => write!(f, "attr({})", Name(n)),
            Self::Trust(n) => write!(f, "trust({})", Name(n)),
            Self::Attention => write!(f, "attention"),
            Self::Sanity => write!(f, "sanity"),
            Self::Stress => write!(f, "stress"),
            Self::Doubt => write!(f, "doubt"),
            Self::Obsession => write!(f, "obsession"),
            Self::Paranoia => write!(f, "paranoia"),
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<`
    #[serde(rename = "<")]
    Lt,
}

impl CmpOp {
    /// Apply the operator.
    pub fn apply<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Ge => lhs >= rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
        }
    }

    /// Parse an operator symbol.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            _ => None,
        }
    }

    /// The operator's source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A condition that can be evaluated against a game-state snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// A flag is present and truthy.
    FlagSet {
        /// Flag key.
        key: String,
    },
    /// A flag equals (or differs from) a value.
    FlagEquals {
        /// Flag key.
        key: String,
        /// Expected value.
        value: FlagValue,
        /// `true` to negate the comparison (`!=`).
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        negated: bool,
    },
    /// Numeric comparison against a subject.
    Compare {
        /// What to read.
        subject: Subject,
        /// How to compare.
        op: CmpOp,
        /// Right-hand side.
        value: i32,
    },
    /// Held evidence carries this tag (or has this id).
    HasTag {
        /// Evidence tag.
        tag: String,
    },
    /// The player carries this item.
    HasItem {
        /// Item id.
        item: String,
    },
    /// The player holds this theory.
    TheoryActive {
        /// Theory id.
        theory: String,
    },
    /// This item is equipped.
    Equipped {
        /// Item id.
        item: String,
    },
    /// Logical NOT.
    Not(Box<Condition>),
    /// Logical AND.
    And(Vec<Condition>),
    /// Logical OR.
    Or(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Shorthand for `skill(name) >= level`.
    pub fn skill_at_least(name: impl Into<String>, level: i32) -> Self {
        Self::Compare {
            subject: Subject::Skill(name.into()),
            op: CmpOp::Ge,
            value: level,
        }
    }

    /// Shorthand for `flag(key)`.
    pub fn flag(key: impl Into<String>) -> Self {
        Self::FlagSet { key: key.into() }
    }

    /// Shorthand for `has_tag(tag)`.
    pub fn has_tag(tag: impl Into<String>) -> Self {
        Self::HasTag { tag: tag.into() }
    }

    /// Evaluate the condition against the current state.
    pub fn evaluate(&self, snapshot: &GameSnapshot) -> bool {
        match self {
            Condition::FlagSet { key } => snapshot.flag(key).is_some_and(FlagValue::is_truthy),
            Condition::FlagEquals {
                key,
                value,
                negated,
            } => (snapshot.flag(key) == Some(value)) != *negated,
            Condition::Compare { subject, op, value } => {
                op.apply(snapshot.value_of(subject), *value)
            }
            Condition::HasTag { tag } => snapshot.evidence_tags.contains(tag),
            Condition::HasItem { item } => snapshot.inventory.contains(item),
            Condition::TheoryActive { theory } => snapshot.theories.contains(theory),
            Condition::Equipped { item } => snapshot.equipment.contains(item),
            Condition::Not(inner) => !inner.evaluate(snapshot),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(snapshot)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.evaluate(snapshot)),
            Condition::Always => true,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Condition::Or(c) if c.len() > 1 => 0,
            Condition::And(c) if c.len() > 1 => 1,
            _ => 2,
        }
    }

    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            self.fmt_at(f, 0)?;
            return write!(f, ")");
        }
        match self {
            Condition::FlagSet { key } => write!(f, "flag({})", Name(key)),
            Condition::FlagEquals {
                key,
                value,
                negated,
            } => {
                let op = if *negated { CmpOp::Ne } else { CmpOp::Eq };
                write!(f, "flag({}) {op} ", Name(key))?;
                match value {
                    FlagValue::Text(s) => write!(f, "{s:?}"),
                    other => write!(f, "{other}"),
                }
            }
            Condition::Compare { subject, op, value } => write!(f, "{subject} {op} {value}"),
            Condition::HasTag { tag } => write!(f, "has_tag({})", Name(tag)),
            Condition::HasItem { item } => write!(f, "has_item({})", Name(item)),
            Condition::TheoryActive { theory } => write!(f, "theory({})", Name(theory)),
            Condition::Equipped { item } => write!(f, "equipped({})", Name(item)),
            Condition::Not(inner) => {
                write!(f, "not ")?;
                inner.fmt_at(f, 2)
            }
            Condition::And(conditions) => join(f, conditions, " and ", 2, "always"),
            Condition::Or(conditions) => join(f, conditions, " or ", 1, "not always"),
            Condition::Always => write!(f, "always"),
        }
    }
}

fn join(
    f: &mut fmt::Formatter<'_>,
    conditions: &[Condition],
    sep: &str,
    min: u8,
    empty: &str,
) -> fmt::Result {
    if conditions.is_empty() {
        return f.write_str(empty);
    }
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        c.fmt_at(f, min)?;
    }
    Ok(())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}

/// Prints a name bare when it is a plain identifier, quoted otherwise.
struct Name<'a>(&'a str);

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let bare = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if bare && !is_keyword(self.0) {
            f.write_str(self.0)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

fn is_keyword(s: &str) -> bool {
    matches!(s, "and" | "or" | "not" | "true" | "false" | "always")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot() -> GameSnapshot {
        let mut snap = GameSnapshot::default()
            .with_flag("met_priest", true)
            .with_flag("weather", "storm")
            .with_skill("Forensics", 3)
            .with_evidence_tag("witness_seen");
        snap.inventory.insert("flashlight".into());
        snap.equipment.insert("thermal_camera".into());
        snap.theories.insert("cult".into());
        snap.attention = 40;
        snap
    }

    #[test]
    fn leaves() {
        let snap = snapshot();
        assert!(Condition::flag("met_priest").evaluate(&snap));
        assert!(!Condition::flag("met_mayor").evaluate(&snap));
        assert!(Condition::skill_at_least("forensics", 3).evaluate(&snap));
        assert!(!Condition::skill_at_least("forensics", 4).evaluate(&snap));
        assert!(Condition::has_tag("witness_seen").evaluate(&snap));
        assert!(
            Condition::HasItem {
                item: "flashlight".into()
            }
            .evaluate(&snap)
        );
        assert!(
            Condition::Equipped {
                item: "thermal_camera".into()
            }
            .evaluate(&snap)
        );
        assert!(
            Condition::TheoryActive {
                theory: "cult".into()
            }
            .evaluate(&snap)
        );
    }

    #[test]
    fn flag_equality() {
        let snap = snapshot();
        let eq = Condition::FlagEquals {
            key: "weather".into(),
            value: "storm".into(),
            negated: false,
        };
        assert!(eq.evaluate(&snap));
        let ne = Condition::FlagEquals {
            key: "weather".into(),
            value: "storm".into(),
            negated: true,
        };
        assert!(!ne.evaluate(&snap));
    }

    #[test]
    fn logic() {
        let snap = snapshot();
        let cond = Condition::And(vec![
            Condition::flag("met_priest"),
            Condition::Not(Box::new(Condition::flag("met_mayor"))),
            Condition::Or(vec![
                Condition::has_tag("aurora_footage"),
                Condition::Compare {
                    subject: Subject::Attention,
                    op: CmpOp::Lt,
                    value: 50,
                },
            ]),
        ]);
        assert!(cond.evaluate(&snap));
        assert!(Condition::And(vec![]).evaluate(&snap));
        assert!(!Condition::Or(vec![]).evaluate(&snap));
    }

    #[test]
    fn display_syntax() {
        let cond = Condition::And(vec![
            Condition::skill_at_least("Occult Knowledge", 2),
            Condition::Or(vec![
                Condition::flag("met_priest"),
                Condition::Not(Box::new(Condition::has_tag("witness_seen"))),
            ]),
        ]);
        assert_eq!(
            cond.to_string(),
            r#"skill("Occult Knowledge") >= 2 and (flag(met_priest) or not has_tag(witness_seen))"#
        );
    }

    #[test]
    fn display_quotes_text_values_and_keywords() {
        let cond = Condition::FlagEquals {
            key: "or".into(),
            value: "storm".into(),
            negated: true,
        };
        assert_eq!(cond.to_string(), r#"flag("or") != "storm""#);
    }

    #[test]
    fn json_shape() {
        let json = r#"{"and": [
            {"compare": {"subject": {"skill": "Forensics"}, "op": ">=", "value": 3}},
            {"flag_set": {"key": "met_priest"}},
            "always"
        ]}"#;
        let cond: Condition = serde_json::from_str(json).unwrap();
        assert!(cond.evaluate(&snapshot()));
        let back = serde_json::to_string(&cond).unwrap();
        let again: Condition = serde_json::from_str(&back).unwrap();
        assert_eq!(cond, again);
    }

    proptest! {
        #[test]
        fn ge_is_not_lt(a in -100i32..100, b in -100i32..100) {
            prop_assert_eq!(CmpOp::Ge.apply(a, b), !CmpOp::Lt.apply(a, b));
            prop_assert_eq!(CmpOp::Eq.apply(a, b), !CmpOp::Ne.apply(a, b));
        }

        #[test]
        fn double_negation(attention in 0i32..200, threshold in 0i32..200) {
            let mut snap = GameSnapshot::default();
            snap.attention = attention;
            let leaf = Condition::Compare { subject: Subject::Attention, op: CmpOp::Ge, value: threshold };
            let twice = Condition::Not(Box::new(Condition::Not(Box::new(leaf.clone()))));
            prop_assert_eq!(leaf.evaluate(&snap), twice.evaluate(&snap));
        }
    }
}
