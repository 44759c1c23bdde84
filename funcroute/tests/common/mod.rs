#![allow(dead_code)]

use funcroute::{BoxHandler, HttpEvent, HttpResult, InvocationContext, Message, boxed};
use serde_json::{Value, json};

// ============================================================================
// Context and Envelopes
// ============================================================================

pub fn ctx() -> InvocationContext {
    InvocationContext::new("test-request")
}

pub fn json_post(body: &str) -> HttpEvent {
    HttpEvent::new("POST")
        .with_header("Content-Type", "application/json")
        .with_body(body)
}

pub fn with_origin(event: HttpEvent, origin: &str) -> HttpEvent {
    event.with_header("Origin", origin)
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler answering every event with `status` and `body`.
pub fn respond<E: Message>(status: u16, body: &'static str) -> BoxHandler<E> {
    boxed(move |_event: E, _ctx: InvocationContext| async move {
        HttpResult::new(status).with_body(body)
    })
}

// ============================================================================
// Wire Fixtures
// ============================================================================

pub fn timer_json(trigger_id: &str) -> Value {
    json!({
        "event_metadata": {
            "event_id": "a1s41g2n5g0o5p8b2k3s",
            "event_type": "yandex.cloud.events.serverless.triggers.TimerMessage",
            "created_at": "2024-03-01T10:00:00Z",
            "cloud_id": "b1gvlrnlei4l5idm9cbj",
            "folder_id": "b1g88tflru0ek1omtsu0"
        },
        "details": { "trigger_id": trigger_id }
    })
}

pub fn queue_json(queue_id: &str, body: &str) -> Value {
    json!({
        "event_metadata": {
            "event_id": "cce76685-5828-4304-a83d-95643c0507a0",
            "event_type": "yandex.cloud.events.messagequeue.QueueMessage",
            "created_at": "2024-03-01T10:00:00Z"
        },
        "details": {
            "queue_id": queue_id,
            "message": {
                "message_id": "cdb1c2f1-2ac2-4a66-b1f3-4e5f8f2d8b1a",
                "md5_of_body": "d29343907090dff4cec4a9a0efb80d20",
                "body": body,
                "attributes": { "SentTimestamp": "1709287200000" },
                "message_attributes": {}
            }
        }
    })
}

pub fn storage_json(event_type: &str, bucket_id: &str, object_id: &str) -> Value {
    json!({
        "event_metadata": {
            "event_id": "bb1dd06d-a82c-49b4-af98-d8e0c5a1d8f0",
            "event_type": event_type,
            "created_at": "2024-03-01T10:00:00Z"
        },
        "details": { "bucket_id": bucket_id, "object_id": object_id }
    })
}

pub fn iot_json(registry_id: &str, device_id: &str, mqtt_topic: &str) -> Value {
    json!({
        "event_metadata": {
            "event_id": "37ee3b0b-b5b3-4a74-9e77-d0b6b1a3c0d1",
            "event_type": "yandex.cloud.events.iot.IoTMessage",
            "created_at": "2024-03-01T10:00:00Z"
        },
        "details": {
            "registry_id": registry_id,
            "device_id": device_id,
            "mqtt_topic": mqtt_topic,
            "payload": "VGVtcGVyYXR1cmU6IDM2LjY="
        }
    })
}

pub fn batch(messages: Vec<Value>) -> Value {
    json!({ "messages": messages })
}
