//! Trigger batch envelope and its sub-messages.
//!
//! A trigger envelope carries an ordered list of messages. Each message is
//! tagged by `event_metadata.event_type`; the tag decides which variant of
//! [`TriggerMessage`] it deserializes into.
//!
//! Deserializing a single message never fails once it is valid JSON: a
//! missing tag yields [`TriggerMessage::Unrecognized`], a known tag with
//! unreadable details yields [`TriggerMessage::Malformed`]. Either fails only
//! that message when dispatched.

use super::Category;
use crate::{message::Message, serde_ext::de_null_default};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Literal `event_type` tags of the known sub-message shapes.
pub mod event_type {
    /// Timer trigger tick.
    pub const TIMER: &str = "yandex.cloud.events.serverless.triggers.TimerMessage";
    /// Message-queue delivery.
    pub const MESSAGE_QUEUE: &str = "yandex.cloud.events.messagequeue.QueueMessage";
    /// Object created in a bucket.
    pub const OBJECT_CREATE: &str = "yandex.cloud.events.storage.ObjectCreate";
    /// Object overwritten in a bucket.
    pub const OBJECT_UPDATE: &str = "yandex.cloud.events.storage.ObjectUpdate";
    /// Object removed from a bucket.
    pub const OBJECT_DELETE: &str = "yandex.cloud.events.storage.ObjectDelete";
    /// IoT Core MQTT message.
    pub const IOT_MESSAGE: &str = "yandex.cloud.events.iot.IoTMessage";
}

/// A batch of asynchronous trigger messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Messages in delivery order.
    pub messages: Vec<TriggerMessage>,
}

impl Message for TriggerEvent {}

impl TriggerEvent {
    /// Creates a batch from the given messages.
    pub fn new(messages: impl IntoIterator<Item = TriggerMessage>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }
}

/// Metadata common to every trigger message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique id of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Variant tag.
    pub event_type: String,
    /// Creation timestamp as sent by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Cloud the event originates from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_id: Option<String>,
    /// Folder the event originates from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl EventMetadata {
    /// Metadata carrying only a type tag.
    pub fn of_type(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Self::default()
        }
    }
}

/// A timer trigger tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerMessage {
    /// Common metadata.
    pub event_metadata: EventMetadata,
    /// Timer-specific details.
    pub details: TimerDetails,
}

/// Details of a timer tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerDetails {
    /// The trigger that fired.
    pub trigger_id: String,
    /// Optional payload configured on the trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl TimerMessage {
    /// A tick from the given trigger.
    pub fn new(trigger_id: impl Into<String>) -> Self {
        Self {
            event_metadata: EventMetadata::of_type(event_type::TIMER),
            details: TimerDetails {
                trigger_id: trigger_id.into(),
                payload: None,
            },
        }
    }
}

/// A message-queue delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Common metadata.
    pub event_metadata: EventMetadata,
    /// Queue-specific details.
    pub details: QueueDetails,
}

/// Details of a queue delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueDetails {
    /// Source queue.
    pub queue_id: String,
    /// The delivered message.
    pub message: QueuedMessage,
}

/// The queued message itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueuedMessage {
    /// Queue-assigned message id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// MD5 of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_of_body: Option<String>,
    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// System attributes.
    #[serde(default, deserialize_with = "de_null_default")]
    pub attributes: HashMap<String, String>,
    /// User attributes, passed through untouched.
    #[serde(default)]
    pub message_attributes: serde_json::Value,
}

impl QueueMessage {
    /// A delivery from the given queue with the given body.
    pub fn new(queue_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            event_metadata: EventMetadata::of_type(event_type::MESSAGE_QUEUE),
            details: QueueDetails {
                queue_id: queue_id.into(),
                message: QueuedMessage {
                    body: Some(body.into()),
                    ..QueuedMessage::default()
                },
            },
        }
    }

    /// The message body, if any.
    pub fn body(&self) -> Option<&str> {
        self.details.message.body.as_deref()
    }
}

/// An object-storage lifecycle notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageMessage {
    /// Common metadata; `event_type` names the lifecycle transition.
    pub event_metadata: EventMetadata,
    /// Storage-specific details.
    pub details: StorageDetails,
}

/// Details of a storage notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageDetails {
    /// Bucket holding the object.
    pub bucket_id: String,
    /// Object key.
    pub object_id: String,
}

impl StorageMessage {
    /// A notification with the given lifecycle tag for `bucket_id/object_id`.
    pub fn new(
        event_type: impl Into<String>,
        bucket_id: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            event_metadata: EventMetadata::of_type(event_type),
            details: StorageDetails {
                bucket_id: bucket_id.into(),
                object_id: object_id.into(),
            },
        }
    }
}

/// An IoT Core MQTT message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IotMessage {
    /// Common metadata.
    pub event_metadata: EventMetadata,
    /// IoT-specific details.
    pub details: IotDetails,
}

/// Details of an IoT message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IotDetails {
    /// Registry of the device.
    pub registry_id: String,
    /// Publishing device.
    pub device_id: String,
    /// MQTT topic the message was published to.
    pub mqtt_topic: String,
    /// Message payload (base64, as delivered).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl IotMessage {
    /// A message published by `device_id` of `registry_id` on `mqtt_topic`.
    pub fn new(
        registry_id: impl Into<String>,
        device_id: impl Into<String>,
        mqtt_topic: impl Into<String>,
    ) -> Self {
        Self {
            event_metadata: EventMetadata::of_type(event_type::IOT_MESSAGE),
            details: IotDetails {
                registry_id: registry_id.into(),
                device_id: device_id.into(),
                mqtt_topic: mqtt_topic.into(),
                payload: None,
            },
        }
    }
}

/// A message whose tag is not one of the known shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedMessage {
    /// Common metadata.
    pub event_metadata: EventMetadata,
    /// Details, kept as raw JSON.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// A message with a known tag whose body does not have the tagged shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MalformedMessage {
    /// Metadata as far as it could be read.
    #[serde(skip)]
    pub event_metadata: EventMetadata,
    /// Why the message could not be read.
    #[serde(skip)]
    pub reason: String,
    /// The message as delivered.
    pub raw: serde_json::Value,
}

impl Message for TimerMessage {}
impl Message for QueueMessage {}
impl Message for StorageMessage {}
impl Message for IotMessage {}

/// One sub-message of a trigger batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TriggerMessage {
    /// Timer tick.
    Timer(TimerMessage),
    /// Message-queue delivery.
    Queue(QueueMessage),
    /// Object-storage notification.
    Storage(StorageMessage),
    /// IoT Core message.
    Iot(IotMessage),
    /// Unknown or missing tag; dispatching it fails with `UnknownMessageType`.
    Unrecognized(UnrecognizedMessage),
    /// Known tag, unreadable body; dispatching it fails with `InvalidRequest`.
    Malformed(MalformedMessage),
}

impl TriggerMessage {
    /// The `event_type` tag of this message.
    pub fn event_type(&self) -> &str {
        &self.metadata().event_type
    }

    /// Common metadata of this message.
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            TriggerMessage::Timer(m) => &m.event_metadata,
            TriggerMessage::Queue(m) => &m.event_metadata,
            TriggerMessage::Storage(m) => &m.event_metadata,
            TriggerMessage::Iot(m) => &m.event_metadata,
            TriggerMessage::Unrecognized(m) => &m.event_metadata,
            TriggerMessage::Malformed(m) => &m.event_metadata,
        }
    }

    /// Route category of this message, `None` when the tag is unknown or the
    /// body is malformed.
    pub fn category(&self) -> Option<Category> {
        match self {
            TriggerMessage::Timer(_) => Some(Category::Timer),
            TriggerMessage::Queue(_) => Some(Category::MessageQueue),
            TriggerMessage::Storage(_) => Some(Category::ObjectStorage),
            TriggerMessage::Iot(_) => Some(Category::IotMessage),
            TriggerMessage::Unrecognized(_) | TriggerMessage::Malformed(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for TriggerMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(TriggerMessage::from_value)
    }
}

impl TriggerMessage {
    /// Reads one message by its tag. Never fails; see the module docs.
    pub fn from_value(value: serde_json::Value) -> Self {
        let metadata = read_metadata(&value);
        let tag = metadata.event_type.clone();
        let message = match tag.as_str() {
            event_type::TIMER => serde_json::from_value(value.clone()).map(TriggerMessage::Timer),
            event_type::MESSAGE_QUEUE => {
                serde_json::from_value(value.clone()).map(TriggerMessage::Queue)
            }
            event_type::OBJECT_CREATE | event_type::OBJECT_UPDATE | event_type::OBJECT_DELETE => {
                serde_json::from_value(value.clone()).map(TriggerMessage::Storage)
            }
            event_type::IOT_MESSAGE => {
                serde_json::from_value(value.clone()).map(TriggerMessage::Iot)
            }
            _ => {
                return TriggerMessage::Unrecognized(UnrecognizedMessage {
                    event_metadata: metadata,
                    details: value.get("details").cloned().unwrap_or_default(),
                });
            }
        };
        message.unwrap_or_else(|e| {
            TriggerMessage::Malformed(MalformedMessage {
                event_metadata: metadata,
                reason: e.to_string(),
                raw: value,
            })
        })
    }
}

/// Metadata of a raw message. Falls back to the bare tag, or an empty tag,
/// when the metadata object does not deserialize.
fn read_metadata(value: &serde_json::Value) -> EventMetadata {
    let metadata = value.get("event_metadata");
    metadata
        .and_then(|metadata| EventMetadata::deserialize(metadata).ok())
        .unwrap_or_else(|| {
            EventMetadata::of_type(
                metadata
                    .and_then(|metadata| metadata.get("event_type"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default(),
            )
        })
}

impl From<TimerMessage> for TriggerMessage {
    fn from(message: TimerMessage) -> Self {
        TriggerMessage::Timer(message)
    }
}

impl From<QueueMessage> for TriggerMessage {
    fn from(message: QueueMessage) -> Self {
        TriggerMessage::Queue(message)
    }
}

impl From<StorageMessage> for TriggerMessage {
    fn from(message: StorageMessage) -> Self {
        TriggerMessage::Storage(message)
    }
}

impl From<IotMessage> for TriggerMessage {
    fn from(message: IotMessage) -> Self {
        TriggerMessage::Iot(message)
    }
}
