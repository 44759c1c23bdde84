//! Predicate evaluators.
//!
//! Pure functions turning one optional route filter into a boolean against an
//! event field. An absent filter always holds. Expected mismatches are
//! `Ok(false)`; only conditions that must abort the dispatch are errors.

pub mod http;

use crate::matcher;
use funcroute_core::RouterError;
use regex::Regex;
use serde_json::{Value, error::Category as JsonErrorCategory};

/// Exact identifier filter: holds when absent or equal to `actual`.
pub fn exact(filter: Option<&str>, actual: &str) -> bool {
    filter.is_none_or(|expected| expected == actual)
}

/// Parses a body as JSON.
///
/// Syntax errors (including truncated input) are an expected mismatch and
/// yield `Ok(None)`; any other parse failure is an
/// [`RouterError::InvalidRequest`].
pub fn parse_json_body(body: &str) -> Result<Option<Value>, RouterError> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => match e.classify() {
            JsonErrorCategory::Syntax | JsonErrorCategory::Eof => Ok(None),
            JsonErrorCategory::Io | JsonErrorCategory::Data => Err(RouterError::invalid_request(
                format!("body could not be read as json: {e}"),
            )),
        },
    }
}

/// JSON body filter: the body parses and structurally contains `pattern`.
pub fn json_body_matches(body: Option<&str>, pattern: &Value) -> Result<bool, RouterError> {
    let Some(body) = body else {
        return Ok(false);
    };
    Ok(parse_json_body(body)?.is_some_and(|data| matcher::matches(&data, pattern)))
}

/// Regex body filter: an absent or empty body never matches.
pub fn body_pattern_matches(body: Option<&str>, pattern: &Regex) -> bool {
    body.is_some_and(|body| !body.is_empty() && pattern.is_match(body))
}
