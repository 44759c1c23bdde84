//! HTTP predicates: method, query parameters and body.

use super::json_body_matches;
use funcroute_core::{HttpEvent, RouterError};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Method filter: case-insensitive membership; an absent filter holds.
pub fn method_matches(filter: Option<&[String]>, method: &str) -> bool {
    filter.is_none_or(|methods| {
        methods
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(method.trim()))
    })
}

/// A filter on one query-string parameter.
///
/// Deserializes from `{ "type": "exact" | "substring" | "regexp", "value": ... }`.
/// Any other `type` is kept as [`ParamPredicate::Unsupported`] and fails the
/// dispatch when evaluated.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawParamPredicate")]
pub enum ParamPredicate {
    /// Holds when the parameter equals the value; `None` matches an absent
    /// parameter.
    Exact(Option<String>),
    /// Holds when the parameter contains the value. An empty value never
    /// holds.
    Substring(String),
    /// Holds when the pattern matches the parameter. An absent parameter is
    /// tested as the empty string, so `^$` holds for a missing key. No
    /// pattern never holds.
    Regexp(Option<Regex>),
    /// A predicate type this router does not know.
    Unsupported(String),
}

impl ParamPredicate {
    /// Exact match against `value`.
    pub fn exact(value: impl Into<String>) -> Self {
        ParamPredicate::Exact(Some(value.into()))
    }

    /// Substring match against `value`.
    pub fn substring(value: impl Into<String>) -> Self {
        ParamPredicate::Substring(value.into())
    }

    /// Regex match against `pattern`.
    pub fn regexp(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(|re| ParamPredicate::Regexp(Some(re)))
    }

    /// Evaluates the predicate against a parameter value.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnsupportedParamPredicateType`] for
    /// [`ParamPredicate::Unsupported`].
    pub fn evaluate(&self, value: Option<&str>) -> Result<bool, RouterError> {
        match self {
            ParamPredicate::Exact(expected) => Ok(expected.as_deref() == value),
            ParamPredicate::Substring(needle) => {
                Ok(!needle.is_empty() && value.is_some_and(|value| value.contains(needle.as_str())))
            }
            ParamPredicate::Regexp(Some(pattern)) => Ok(pattern.is_match(value.unwrap_or(""))),
            ParamPredicate::Regexp(None) => Ok(false),
            ParamPredicate::Unsupported(kind) => {
                Err(RouterError::UnsupportedParamPredicateType(kind.clone()))
            }
        }
    }
}

#[derive(Deserialize)]
struct RawParamPredicate {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Option<String>,
}

impl TryFrom<RawParamPredicate> for ParamPredicate {
    type Error = regex::Error;

    fn try_from(raw: RawParamPredicate) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_str() {
            "exact" => ParamPredicate::Exact(raw.value),
            "substring" => ParamPredicate::Substring(raw.value.unwrap_or_default()),
            "regexp" => ParamPredicate::Regexp(raw.value.as_deref().map(Regex::new).transpose()?),
            _ => ParamPredicate::Unsupported(raw.kind),
        })
    }
}

/// Param filter: every `(key, predicate)` holds, in declared order.
///
/// Keys on both sides are compared in lower case; values as-is. `filter` keys
/// are expected to be lower-cased already.
pub fn params_match(
    filter: &[(String, ParamPredicate)],
    query: &HashMap<String, String>,
) -> Result<bool, RouterError> {
    for (key, predicate) in filter {
        if !predicate.evaluate(query_value(query, key))? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Looks up `key` ignoring case. When several query keys differ only in case,
/// the lower-case key wins, then the smallest key in byte order.
fn query_value<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    if let Some(value) = query.get(key) {
        return Some(value.as_str());
    }
    query
        .iter()
        .filter(|(candidate, _)| candidate.to_lowercase() == key)
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| value.as_str())
}

/// Whether the request declares a JSON body via `Content-Type`.
pub fn is_json_content(event: &HttpEvent) -> bool {
    event
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

/// JSON body filter for HTTP: requires a JSON content type, then a body that
/// parses and structurally contains `pattern`.
pub fn json_request_matches(event: &HttpEvent, pattern: &Value) -> Result<bool, RouterError> {
    if !is_json_content(event) {
        return Ok(false);
    }
    json_body_matches(event.body_text().as_deref(), pattern)
}
