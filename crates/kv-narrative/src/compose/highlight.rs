//! Keyword emphasis for display.

use regex::{Regex, RegexBuilder};

use crate::error::{NarrativeError, NarrativeResult};

/// Wraps configured keywords in `**...**`.
///
/// Matching is case-insensitive. A keyword edge that is a word character must
/// sit on a word boundary. Longer keywords are tried first so a phrase is
/// emphasized as one unit.
#[derive(Debug, Clone)]
pub struct Highlighter {
    regex: Option<Regex>,
}

impl Highlighter {
    /// Build from a keyword list. Blank keywords are ignored.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> NarrativeResult<Self> {
        let mut words: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();
        if words.is_empty() {
            return Ok(Self { regex: None });
        }
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();
        let alternation = words
            .iter()
            .map(|w| bounded(w))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .map_err(|source| NarrativeError::InvalidPattern {
                id: "highlight".to_string(),
                source,
            })?;
        Ok(Self { regex: Some(regex) })
    }

    /// Emphasize every keyword in `text`, keeping its original case.
    pub fn highlight(&self, text: &str) -> String {
        match &self.regex {
            Some(regex) => regex.replace_all(text, "**${0}**").into_owned(),
            None => text.to_string(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escaped keyword with `\b` on each side that starts or ends with a word character.
fn bounded(keyword: &str) -> String {
    let mut pattern = String::new();
    if keyword.starts_with(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(keyword));
    if keyword.ends_with(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}
