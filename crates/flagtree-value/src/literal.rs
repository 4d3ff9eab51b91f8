//! Raw override literal coercion.
//!
//! Coerces a raw command-line string into a value of a kind that is already
//! known from the schema. There is exactly one accepted spelling family per
//! kind; nothing is guessed from the text alone.

use thiserror::Error;

use crate::kind::Kind;
use crate::value::TypedValue;

/// Spellings accepted for booleans (case-sensitive).
const TRUE_SPELLINGS: &[&str] = &["true", "True"];
const FALSE_SPELLINGS: &[&str] = &["false", "False"];

/// A raw literal that could not be read as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {raw:?} as {kind}: {reason}")]
pub struct LiteralError {
    pub kind: Kind,
    pub raw: String,
    pub reason: String,
}

impl LiteralError {
    fn new(kind: Kind, raw: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Coerce `raw` into a value of `kind`.
///
/// Tuple arity is not checked here: `(10,)` is a valid `tuple<int>` no matter
/// how many elements the default had.
pub fn coerce_literal(kind: Kind, raw: &str) -> Result<TypedValue, LiteralError> {
    match kind {
        Kind::Int => parse_int(raw).map(TypedValue::Int),
        Kind::Float => parse_float(raw).map(TypedValue::Float),
        Kind::Bool => parse_bool(raw).map(TypedValue::Bool),
        Kind::Str => Ok(TypedValue::Str(unquote(raw).to_string())),
        Kind::IntTuple => split_tuple(kind, raw)?
            .into_iter()
            .map(|item| parse_int(item).map_err(|e| LiteralError::new(kind, raw, e.reason)))
            .collect::<Result<Vec<_>, _>>()
            .map(TypedValue::IntTuple),
        Kind::FloatTuple => split_tuple(kind, raw)?
            .into_iter()
            .map(|item| parse_float(item).map_err(|e| LiteralError::new(kind, raw, e.reason)))
            .collect::<Result<Vec<_>, _>>()
            .map(TypedValue::FloatTuple),
        Kind::StrTuple => Ok(TypedValue::StrTuple(
            split_tuple(kind, raw)?
                .into_iter()
                .map(|item| unquote(item).to_string())
                .collect(),
        )),
    }
}

fn parse_int(raw: &str) -> Result<i64, LiteralError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| LiteralError::new(Kind::Int, raw, format!("{:?}: {}", raw.trim(), e)))
}

fn parse_float(raw: &str) -> Result<f64, LiteralError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| LiteralError::new(Kind::Float, raw, format!("{:?}: {}", raw.trim(), e)))?;
    if !value.is_finite() {
        return Err(LiteralError::new(
            Kind::Float,
            raw,
            format!("{:?} is not a finite number", raw.trim()),
        ));
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> Result<bool, LiteralError> {
    let trimmed = raw.trim();
    if TRUE_SPELLINGS.contains(&trimmed) {
        Ok(true)
    } else if FALSE_SPELLINGS.contains(&trimmed) {
        Ok(false)
    } else {
        Err(LiteralError::new(
            Kind::Bool,
            raw,
            "expected one of true, false, True, False",
        ))
    }
}

/// Trim surrounding whitespace, then strip one matching pair of quotes.
///
/// Text inside the quotes is kept exactly, including its whitespace.
fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Split a tuple literal into trimmed element strings.
///
/// Accepts `(a, b)`, `[a, b]`, `a,b`, `(a,)`, `()` and `[]`.
fn split_tuple(kind: Kind, raw: &str) -> Result<Vec<&str>, LiteralError> {
    let trimmed = raw.trim();
    let inner = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some('('), Some(')')) | (Some('['), Some(']')) if trimmed.len() >= 2 => {
            &trimmed[1..trimmed.len() - 1]
        }
        (Some('('), _) | (Some('['), _) | (_, Some(')')) | (_, Some(']')) => {
            return Err(LiteralError::new(kind, raw, "unbalanced brackets"));
        }
        _ => trimmed,
    };

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut items = split_outside_quotes(kind, raw, inner)?;
    if items.len() > 1 && items.last() == Some(&"") {
        items.pop();
    }
    if items.iter().any(|item| item.is_empty()) {
        return Err(LiteralError::new(kind, raw, "empty tuple element"));
    }
    Ok(items)
}

/// Split on commas that are not inside `'...'` or `"..."`.
fn split_outside_quotes<'a>(
    kind: Kind,
    raw: &str,
    inner: &'a str,
) -> Result<Vec<&'a str>, LiteralError> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ',') => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return Err(LiteralError::new(kind, raw, "unterminated quote"));
    }
    items.push(inner[start..].trim());
    Ok(items)
}
