//! Invocation context.
//!
//! The runtime hands every invocation a context alongside the envelope. Its
//! request id is the correlation id for every log record of the dispatch.

use serde::{Deserialize, Serialize};

/// Per-invocation metadata supplied by the function runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    /// Runtime-assigned request id.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Name of the invoked function.
    #[serde(default)]
    pub function_name: Option<String>,
    /// Version of the invoked function.
    #[serde(default)]
    pub function_version: Option<String>,
    /// Memory limit of the function instance.
    #[serde(default, rename = "memoryLimitInMB")]
    pub memory_limit_in_mb: Option<u32>,
}

impl InvocationContext {
    /// A context carrying only a request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            ..Self::default()
        }
    }

    /// The correlation id for log records; empty when the runtime sent none.
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("")
    }
}
