//! HTTP invocation envelope.

use crate::{message::Message, serde_ext::de_null_default};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap};

/// An HTTP call delivered to the function by the API gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    /// Request method as sent by the client (`GET`, `post`, ...).
    pub http_method: String,

    /// Full request URL, when the gateway provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request path, when the gateway provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Single-valued request headers.
    #[serde(default, deserialize_with = "de_null_default")]
    pub headers: HashMap<String, String>,

    /// All values of every request header.
    #[serde(default, deserialize_with = "de_null_default")]
    pub multi_value_headers: HashMap<String, Vec<String>>,

    /// Single-valued query-string parameters.
    #[serde(default, deserialize_with = "de_null_default")]
    pub query_string_parameters: HashMap<String, String>,

    /// All values of every query-string parameter.
    #[serde(default, deserialize_with = "de_null_default")]
    pub multi_value_query_string_parameters: HashMap<String, Vec<String>>,

    /// Gateway request metadata, passed through untouched.
    #[serde(default)]
    pub request_context: serde_json::Value,

    /// Raw request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl Message for HttpEvent {}

impl HttpEvent {
    /// Creates an envelope for the given method with no headers, query or body.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Self::default()
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query-string parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .insert(name.into(), value.into());
        self
    }

    /// Sets a plain-text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Sets a body from raw bytes, base64 encoding it the way the gateway does
    /// for binary payloads.
    pub fn with_base64_body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.body = Some(BASE64.encode(body));
        self.is_base64_encoded = true;
        self
    }

    /// Sets the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Looks up a header by name, ignoring case.
    ///
    /// Single-valued headers are consulted first, then the first value of a
    /// multi-valued header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .or_else(|| {
                self.multi_value_headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .and_then(|(_, values)| values.first())
                    .map(String::as_str)
            })
    }

    /// Names of every header present on the request.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str).chain(
            self.multi_value_headers
                .keys()
                .filter(|key| !self.headers.contains_key(*key))
                .map(String::as_str),
        )
    }

    /// Looks up a query-string parameter by its exact name.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// The method with surrounding whitespace removed.
    pub fn method(&self) -> &str {
        self.http_method.trim()
    }

    /// The request body as text, base64-decoded when the gateway flagged it.
    ///
    /// A flagged body that is not valid base64 or not UTF-8 reads as absent.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        let body = self.body.as_deref()?;
        if !self.is_base64_encoded {
            return Some(Cow::Borrowed(body));
        }
        let bytes = BASE64.decode(body).ok()?;
        String::from_utf8(bytes).ok().map(Cow::Owned)
    }
}
