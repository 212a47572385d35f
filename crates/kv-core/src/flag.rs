use std::fmt;

use serde::{Deserialize, Serialize};

/// A value stored under a player flag.
///
/// Serialized untagged, so content can write `true`, `3`, or `"met"` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean flag.
    Bool(bool),
    /// A counter or numeric marker.
    Int(i64),
    /// A free-text marker.
    Text(String),
}

impl FlagValue {
    /// Whether this value counts as "set" for a bare `flag(x)` check.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl Default for FlagValue {
    fn default() -> Self {
        Self::Bool(true)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FlagValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(FlagValue::Bool(true).is_truthy());
        assert!(!FlagValue::Bool(false).is_truthy());
        assert!(FlagValue::Int(2).is_truthy());
        assert!(!FlagValue::Int(0).is_truthy());
        assert!(FlagValue::from("met").is_truthy());
        assert!(!FlagValue::from("").is_truthy());
    }

    #[test]
    fn untagged_json() {
        let values: Vec<FlagValue> = serde_json::from_str(r#"[true, 3, "dusk"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FlagValue::Bool(true),
                FlagValue::Int(3),
                FlagValue::Text("dusk".into())
            ]
        );
    }
}
