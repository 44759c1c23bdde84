//! Handler results and their normalization.

use crate::error::BoxError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result shape returned to the function gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResult {
    /// HTTP status code.
    pub status_code: u16,
    /// Single-valued response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Multi-valued response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    /// Response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_base64_encoded: Option<bool>,
}

impl HttpResult {
    /// A result with the given status and nothing else.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// A result whose body is `value` serialized as JSON, with a matching
    /// `Content-Type`.
    pub fn json<T: Serialize + ?Sized>(status_code: u16, value: &T) -> Result<Self, BoxError> {
        let body = serde_json::to_string(value)?;
        Ok(Self::new(status_code)
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }

    /// Sets a header, replacing a previous value under the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Looks up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether a header with this name is set, ignoring case, in either the
    /// single- or multi-valued map.
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
            || self
                .multi_value_headers
                .as_ref()
                .is_some_and(|headers| headers.keys().any(|key| key.eq_ignore_ascii_case(name)))
    }
}

/// Converts a handler's output into the dispatch outcome.
///
/// # Default Implementations
///
/// - `()` → no result
/// - `HttpResult` → that result
/// - `Option<HttpResult>` → as is
/// - `String` / `&'static str` → `200` with that body
/// - `Result<T, E>` → delegates to `T` or propagates `E` as a handler failure
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "Handler outputs must convert into `Option<HttpResult>` or an error."
)]
pub trait IntoResponse {
    /// Convert the output into an optional result or a handler error.
    fn into_response(self) -> Result<Option<HttpResult>, BoxError>;
}

impl IntoResponse for () {
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        Ok(None)
    }
}

impl IntoResponse for HttpResult {
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        Ok(Some(self))
    }
}

impl IntoResponse for Option<HttpResult> {
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        Ok(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        Ok(Some(HttpResult::new(200).with_body(self)))
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        Ok(Some(HttpResult::new(200).with_body(self)))
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: Into<BoxError>,
{
    fn into_response(self) -> Result<Option<HttpResult>, BoxError> {
        match self {
            Ok(t) => t.into_response(),
            Err(e) => Err(e.into()),
        }
    }
}
