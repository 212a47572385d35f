//! Problems found in a condition string.
//!
//! The CLI shows them as ariadne reports against the expression. Content
//! loading folds them into one line so the error can name the scene, clue or
//! insert the condition belongs to.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

/// A lex or parse error at a byte span of the condition source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte range in the condition source. Empty at end of input.
    pub span: Range<usize>,
    /// What went wrong.
    pub message: String,
}

impl Diagnostic {
    /// An error at `span`.
    pub fn error(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    /// The source text under the span, empty when it points past the end.
    pub fn excerpt<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.clone()).unwrap_or_default().trim()
    }

    fn pointer(&self, source: &str) -> String {
        match self.excerpt(source) {
            "" => "condition ends here".to_string(),
            text => format!("near `{text}`"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ariadne report for every diagnostic. `origin` names where the condition
/// came from, such as `<expr>` or a content location.
pub fn render_diagnostics(source: &str, origin: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();
    for diag in diagnostics {
        let span = clamp(&diag.span, source.len());
        Report::build(ReportKind::Error, (origin, span.clone()))
            .with_message(&diag.message)
            .with_label(
                Label::new((origin, span))
                    .with_message(diag.pointer(source))
                    .with_color(Color::Red),
            )
            .finish()
            .write((origin, Source::from(source)), &mut output)
            .ok();
    }
    String::from_utf8(output).unwrap_or_default()
}

/// All diagnostics on one line, each pointing at the offending text.
pub fn summarize(source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{} ({})", d.message, d.pointer(source)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn clamp(span: &Range<usize>, len: usize) -> Range<usize> {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}
