//! Query validation, normalization, and symbol selection rules.
//!
//! Pure functions, no I/O. Everything here runs before (or instead of) a
//! network call, so a rejected query is guaranteed never to reach the wire.

use common::{Error, QueryKind, Result, SearchResult};

/// Maximum accepted query length, in characters, after trimming.
pub const MAX_QUERY_LEN: usize = 50;

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-')
}

/// Check raw user input against the syntactic rules, in order; the first
/// failing rule wins. Returns the trimmed input unchanged on success —
/// validation does not normalize.
pub fn validate(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyQuery);
    }
    if trimmed.chars().count() > MAX_QUERY_LEN {
        return Err(Error::QueryTooLong { max: MAX_QUERY_LEN });
    }
    if !trimmed.chars().all(is_allowed_char) {
        return Err(Error::InvalidCharacters);
    }
    Ok(trimmed)
}

/// Canonicalize a validated query for submission upstream.
///
/// Ticker symbols are conventionally uppercase; uniform casing avoids
/// duplicate upstream lookups for equivalent queries. Idempotent. No
/// whitespace collapsing beyond the validator's trim.
pub fn normalize(validated: &str) -> String {
    validated.to_uppercase()
}

/// Validate then normalize in one step.
pub fn validate_and_normalize(raw: &str) -> Result<String> {
    Ok(normalize(validate(raw)?))
}

/// Pick the single symbol to request a signal for.
///
/// Tickers resolve to themselves. Companies fall back to the first (best)
/// suggestion, or to the normalized form when no suggestions exist. This is
/// the one source of truth for "which symbol did we actually ask about".
pub fn select_symbol(result: &SearchResult) -> String {
    match result.kind {
        QueryKind::Ticker => result.normalized.clone(),
        QueryKind::Company => result
            .suggestions
            .first()
            .cloned()
            .unwrap_or_else(|| result.normalized.clone()),
    }
}
