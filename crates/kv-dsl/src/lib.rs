//! Condition expression language for Kaltvik content.
//!
//! Content authors gate optional text, passive clues, and scene choices with
//! short boolean expressions:
//!
//! ```text
//! skill(Forensics) >= 3 and (flag(met_priest) or has_tag(witness_seen))
//! ```
//!
//! [`parse_condition`] compiles such a string into the closed
//! [`kv_core::Condition`] tree, or returns every diagnostic it found.

/// Source diagnostics and their terminal rendering.
pub mod diagnostics;
/// Tokenizer.
pub mod lexer;
/// Token-stream parser.
pub mod parser;

use kv_core::Condition;

pub use diagnostics::{Diagnostic, render_diagnostics};

/// Compile a condition expression.
pub fn parse_condition(source: &str) -> Result<Condition, Vec<Diagnostic>> {
    let (tokens, lex_errors) = lexer::lex(source);

    let mut diagnostics: Vec<Diagnostic> = lex_errors
        .into_iter()
        .map(|e| Diagnostic::error(e.span, e.message))
        .collect();

    match parser::parse(&tokens) {
        Ok(condition) if diagnostics.is_empty() => Ok(condition),
        Ok(_) => Err(diagnostics),
        Err(parse_errors) => {
            diagnostics.extend(
                parse_errors
                    .into_iter()
                    .map(|e| Diagnostic::error(e.span, e.message)),
            );
            Err(diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_core::GameSnapshot;

    #[test]
    fn compiles_and_evaluates() {
        let cond = parse_condition("skill(Forensics) >= 3 and flag(met_priest)").unwrap();
        let snap = GameSnapshot::default()
            .with_skill("Forensics", 4)
            .with_flag("met_priest", true);
        assert!(cond.evaluate(&snap));
        assert!(!cond.evaluate(&GameSnapshot::default()));
    }

    #[test]
    fn display_parses_back() {
        let sources = [
            "skill(\"Occult Knowledge\") >= 2 and (flag(met_priest) or not has_tag(witness_seen))",
            "not (theory(cult) and equipped(thermal_camera))",
            "flag(weather) != \"storm\" or attention > 74",
            "trust(father_anders) <= -1",
        ];
        for src in sources {
            let cond = parse_condition(src).unwrap();
            let printed = cond.to_string();
            assert_eq!(parse_condition(&printed).unwrap(), cond, "{printed}");
        }
    }

    #[test]
    fn lex_errors_become_diagnostics() {
        let diags = parse_condition("flag(a) & flag(b)").unwrap_err();
        assert!(diags.iter().any(|d| d.message.contains("unexpected character")));
    }

    #[test]
    fn parse_errors_carry_spans() {
        let diags = parse_condition("skill(Logic) >= ").unwrap_err();
        assert!(!diags.is_empty());
        assert!(diags[0].span.start <= 16);
    }
}
