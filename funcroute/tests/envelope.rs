//! Classification of raw invocation payloads.

mod common;

use common::{batch, ctx, timer_json};
use funcroute::{
    Dispatcher, Envelope, ErrorKind, ErrorPolicy, HttpEvent, HttpResult, HttpRoute,
    InvocationContext, TimerRoute, TriggerMessage, boxed, testing::CountingHandler,
};
use serde_json::json;

fn gateway_request() -> serde_json::Value {
    json!({
        "httpMethod": "POST",
        "url": "https://functions.yandexcloud.net/d4e?action=save",
        "path": "/",
        "headers": {
            "Content-Type": "application/json",
            "X-Forwarded-For": "203.0.113.7",
            "X-Request-Id": "b1d0c0e4-7a0e-4a5f-9a0e-1c5b9c3d2e10"
        },
        "multiValueHeaders": {
            "Content-Type": ["application/json"]
        },
        "queryStringParameters": { "action": "save" },
        "multiValueQueryStringParameters": { "action": ["save"] },
        "requestContext": {
            "identity": { "sourceIp": "203.0.113.7", "userAgent": "curl/8.4.0" },
            "httpMethod": "POST",
            "requestId": "b1d0c0e4-7a0e-4a5f-9a0e-1c5b9c3d2e10",
            "requestTime": "1/Mar/2024:10:00:00 +0000",
            "requestTimeEpoch": 1709287200
        },
        "body": "eyJ0eXBlIjoic2F2ZSJ9",
        "isBase64Encoded": true
    })
}

#[test]
fn test_gateway_request_classifies_as_http() {
    let envelope = Envelope::from_value(gateway_request()).unwrap();
    let Envelope::Http(event) = envelope else {
        panic!("expected an http envelope");
    };
    assert_eq!(event.method(), "POST");
    assert_eq!(event.query("action"), Some("save"));
    assert_eq!(event.body_text().as_deref(), Some(r#"{"type":"save"}"#));
}

#[test]
fn test_trigger_batch_classifies_per_message() {
    let envelope = Envelope::from_value(batch(vec![
        timer_json("t"),
        json!({ "event_metadata": { "event_type": "custom.Event" }, "details": { "a": 1 } }),
    ]))
    .unwrap();
    let Envelope::Trigger(event) = envelope else {
        panic!("expected a trigger envelope");
    };
    assert!(matches!(event.messages[0], TriggerMessage::Timer(_)));
    assert!(matches!(event.messages[1], TriggerMessage::Unrecognized(_)));
    assert_eq!(event.messages[1].event_type(), "custom.Event");
    assert!(event.messages[1].category().is_none());
}

#[test]
fn test_unknown_shapes() {
    for payload in [json!({}), json!({ "httpMethod": "" }), json!([1, 2]), json!("GET")] {
        let err = Envelope::from_value(payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEventType);
    }
}

#[tokio::test]
async fn test_gateway_request_end_to_end() {
    let dispatcher = Dispatcher::builder()
        .http(
            HttpRoute::new(boxed(|event: HttpEvent, ctx: InvocationContext| async move {
                let body = event.body_text().unwrap_or_default().into_owned();
                HttpResult::new(201).with_body(format!("{}:{body}", ctx.request_id()))
            }))
            .methods(["POST"])
            .json(json!({ "type": "save" })),
        )
        .build();

    let result = dispatcher
        .dispatch_value(gateway_request(), &ctx())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.status_code, 201);
    assert_eq!(result.body.as_deref(), Some(r#"test-request:{"type":"save"}"#));
}

#[tokio::test]
async fn test_classification_errors_use_policy() {
    let dispatcher = Dispatcher::builder()
        .error_policy(ErrorPolicy::new())
        .build();

    let err = dispatcher
        .dispatch_value(json!({ "detail-type": "Scheduled Event" }), &ctx())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownEventType);
}

#[tokio::test]
async fn test_context_deserializes_from_runtime_json() {
    let ctx: InvocationContext = serde_json::from_value(json!({
        "requestId": "req-7",
        "functionName": "d4e",
        "functionVersion": "d4e1",
        "memoryLimitInMB": 128
    }))
    .unwrap();
    let counter = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(counter.clone())))
        .build();

    dispatcher
        .dispatch_value(batch(vec![timer_json("t")]), &ctx)
        .await
        .unwrap();
    assert_eq!(counter.count(), 1);
    assert_eq!(ctx.memory_limit_in_mb, Some(128));
}
