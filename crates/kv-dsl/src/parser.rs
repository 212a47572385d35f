use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use kv_core::{CmpOp, Condition, FlagValue, Subject};

use crate::lexer::Token;

type Span = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Byte range the error points at.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

fn is_reserved(w: &str) -> bool {
    matches!(w, "and" | "or" | "not" | "true" | "false" | "always")
}

fn fold_and(mut parts: Vec<Condition>) -> Condition {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        Condition::And(parts)
    }
}

fn fold_or(mut parts: Vec<Condition>) -> Condition {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        Condition::Or(parts)
    }
}

/// Build the condition parser.
///
/// Precedence from loosest to tightest: `or`, `and`, `not`, atoms.
fn condition_parser<'a, I>() -> impl Parser<'a, I, Condition, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    // -- Helpers --

    let kw = |k: &'static str| select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k);
    let ident =
        select! { Token::Word(ref w) if !is_reserved(w.as_str()) => w.clone() }.labelled("name");
    let string_lit = select! { Token::Str(s) => s }.labelled("string");
    let integer = select! { Token::Integer(n, _) => n }.labelled("integer");
    let cmp = select! { Token::Op(op) => op }.labelled("comparison");

    let name = choice((ident.clone(), string_lit.clone())).labelled("name");
    let paren_name = name
        .clone()
        .delimited_by(just(Token::LParen), just(Token::RParen));

    let small_int = integer.clone().try_map(|n, span| {
        i32::try_from(n).map_err(|_| Rich::custom(span, format!("integer out of range: {n}")))
    });

    // -- Numeric subjects --
    let subject = choice((
        kw("skill")
            .ignore_then(paren_name.clone())
            .map(Subject::Skill),
        kw("attr")
            .ignore_then(paren_name.clone())
            .map(Subject::Attribute),
        kw("trust")
            .ignore_then(paren_name.clone())
            .map(Subject::Trust),
        kw("attention").to(Subject::Attention),
        kw("sanity").to(Subject::Sanity),
        kw("stress").to(Subject::Stress),
        kw("doubt").to(Subject::Doubt),
        kw("obsession").to(Subject::Obsession),
        kw("paranoia").to(Subject::Paranoia),
    ))
    .labelled("subject");

    // -- Flag literals --
    let literal = choice((
        kw("true").to(FlagValue::Bool(true)),
        kw("false").to(FlagValue::Bool(false)),
        integer.map(FlagValue::Int),
        string_lit.map(FlagValue::Text),
        ident.map(FlagValue::Text),
    ))
    .labelled("value");

    recursive(|expr| {
        let flag = kw("flag")
            .ignore_then(paren_name.clone())
            .then(cmp.clone().then(literal).or_not())
            .try_map(|(key, rest), span| match rest {
                None => Ok(Condition::FlagSet { key }),
                Some((CmpOp::Eq, value)) => Ok(Condition::FlagEquals {
                    key,
                    value,
                    negated: false,
                }),
                Some((CmpOp::Ne, value)) => Ok(Condition::FlagEquals {
                    key,
                    value,
                    negated: true,
                }),
                Some((op, _)) => Err(Rich::custom(
                    span,
                    format!("flags only compare with == or !=, found {op}"),
                )),
            });

        let compare = subject
            .then(cmp)
            .then(small_int)
            .map(|((subject, op), value)| Condition::Compare { subject, op, value });

        let atom = choice((
            expr.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
            kw("always").to(Condition::Always),
            flag,
            kw("has_tag")
                .ignore_then(paren_name.clone())
                .map(|tag| Condition::HasTag { tag }),
            kw("has_item")
                .ignore_then(paren_name.clone())
                .map(|item| Condition::HasItem { item }),
            kw("theory")
                .ignore_then(paren_name.clone())
                .map(|theory| Condition::TheoryActive { theory }),
            kw("equipped")
                .ignore_then(paren_name.clone())
                .map(|item| Condition::Equipped { item }),
            compare,
        ))
        .labelled("condition");

        let unary = recursive(|unary| {
            kw("not")
                .ignore_then(unary)
                .map(|inner| Condition::Not(Box::new(inner)))
                .or(atom)
        });

        let conjunction = unary
            .separated_by(kw("and"))
            .at_least(1)
            .collect::<Vec<Condition>>()
            .map(fold_and);

        conjunction
            .separated_by(kw("or"))
            .at_least(1)
            .collect::<Vec<Condition>>()
            .map(fold_or)
    })
    .then_ignore(end())
}

/// Parse a token stream into a condition.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Condition, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = condition_parser().parse(stream).into_output_errors();

    if let Some(condition) = output
        && errors.is_empty()
    {
        return Ok(condition);
    }

    Err(errors
        .into_iter()
        .map(|e| ParseError {
            span: e.span().into_range(),
            message: e.to_string(),
        })
        .collect())
}
