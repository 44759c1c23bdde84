//! Invocation envelopes.
//!
//! An [`Envelope`] is either a single HTTP call or a batch of trigger
//! messages. Which one it is follows from its shape alone: an envelope with a
//! non-blank `httpMethod` is HTTP, one with a `messages` array is a trigger
//! batch. Classification happens once, in [`Envelope::from_value`]; after that
//! the variant tag is authoritative.

mod http;
mod trigger;

pub use http::HttpEvent;
pub use trigger::{
    EventMetadata, IotDetails, IotMessage, MalformedMessage, QueueDetails, QueueMessage,
    QueuedMessage, StorageDetails, StorageMessage, TimerDetails, TimerMessage, TriggerEvent,
    TriggerMessage, UnrecognizedMessage, event_type,
};

use crate::{error::RouterError, message::Message};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Route category an envelope or sub-message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// HTTP call.
    Http,
    /// Timer tick.
    Timer,
    /// Message-queue delivery.
    MessageQueue,
    /// Object-storage notification.
    ObjectStorage,
    /// IoT Core message.
    IotMessage,
}

impl Category {
    /// Stable name used in log fields and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Http => "http",
            Category::Timer => "timer",
            Category::MessageQueue => "message_queue",
            Category::ObjectStorage => "object_storage",
            Category::IotMessage => "iot_message",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    /// An HTTP call.
    Http(HttpEvent),
    /// A batch of trigger messages.
    Trigger(TriggerEvent),
}

impl Message for Envelope {}

impl Envelope {
    /// Classifies a raw JSON payload by shape and deserializes it.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownEventType`] when the payload has neither a
    ///   non-blank `httpMethod` nor a `messages` array.
    /// - [`RouterError::InvalidRequest`] when the shape is recognized but the
    ///   payload does not deserialize.
    pub fn from_value(value: Value) -> Result<Self, RouterError> {
        if is_http_shape(&value) {
            return serde_json::from_value(value)
                .map(Envelope::Http)
                .map_err(|e| RouterError::invalid_request(format!("malformed http event: {e}")));
        }
        if is_trigger_shape(&value) {
            return serde_json::from_value(value)
                .map(Envelope::Trigger)
                .map_err(|e| {
                    RouterError::invalid_request(format!("malformed trigger event: {e}"))
                });
        }
        Err(RouterError::UnknownEventType)
    }

    /// `Category::Http` for HTTP envelopes, `None` for trigger batches whose
    /// messages are categorized individually.
    pub fn category(&self) -> Option<Category> {
        match self {
            Envelope::Http(_) => Some(Category::Http),
            Envelope::Trigger(_) => None,
        }
    }
}

impl TryFrom<Value> for Envelope {
    type Error = RouterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Envelope::from_value(value)
    }
}

impl From<HttpEvent> for Envelope {
    fn from(event: HttpEvent) -> Self {
        Envelope::Http(event)
    }
}

impl From<TriggerEvent> for Envelope {
    fn from(event: TriggerEvent) -> Self {
        Envelope::Trigger(event)
    }
}

fn is_http_shape(value: &Value) -> bool {
    value
        .get("httpMethod")
        .and_then(Value::as_str)
        .is_some_and(|method| !method.trim().is_empty())
}

fn is_trigger_shape(value: &Value) -> bool {
    value.get("messages").is_some_and(Value::is_array)
}
