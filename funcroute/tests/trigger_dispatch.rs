//! Trigger batches: per-message routing and error aggregation.

mod common;

use common::{batch, ctx, iot_json, queue_json, respond, storage_json, timer_json};
use funcroute::{
    Category, Dispatcher, ErrorKind, ErrorPolicy, HttpResult, IotMessage, IotRoute, LogLevel,
    QueueMessage, QueueRoute, RouterError, StorageEventType, StorageMessage, StorageRoute,
    TimerRoute, boxed, event_type,
    testing::{CountingHandler, FailingHandler, RecordingHandler, RecordingLogger},
};
use regex::Regex;
use serde_json::json;

fn rethrowing() -> ErrorPolicy {
    ErrorPolicy::new()
}

#[tokio::test]
async fn test_each_category_reaches_its_route() {
    let timer = CountingHandler::new();
    let queue = RecordingHandler::<QueueMessage>::new();
    let storage = RecordingHandler::<StorageMessage>::new();
    let iot = RecordingHandler::<IotMessage>::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(timer.clone())).trigger_id("nightly"))
        .queue(QueueRoute::new(boxed(queue.clone())).queue_id("orders"))
        .storage(
            StorageRoute::new(boxed(storage.clone()))
                .event(StorageEventType::Create)
                .bucket_id("photos"),
        )
        .iot(IotRoute::new(boxed(iot.clone())).device_id("thermo-1"))
        .build();

    let payload = batch(vec![
        timer_json("nightly"),
        queue_json("orders", r#"{"id":1}"#),
        storage_json(event_type::OBJECT_CREATE, "photos", "cat.png"),
        iot_json("reg-1", "thermo-1", "$devices/thermo-1/events"),
    ]);
    let result = dispatcher.dispatch_value(payload, &ctx()).await.unwrap();

    assert_eq!(result, Some(HttpResult::new(200)));
    assert_eq!(timer.count(), 1);
    assert_eq!(queue.events()[0].body(), Some(r#"{"id":1}"#));
    assert_eq!(storage.events()[0].details.object_id, "cat.png");
    assert_eq!(iot.events()[0].details.mqtt_topic, "$devices/thermo-1/events");
}

#[tokio::test]
async fn test_two_failures_are_combined_in_order() {
    let dispatcher = Dispatcher::builder()
        .queue(QueueRoute::new(boxed(FailingHandler::new("queue handler failed"))))
        .storage(StorageRoute::new(boxed(FailingHandler::new("storage handler failed"))))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![
        queue_json("orders", "hello"),
        storage_json(event_type::OBJECT_DELETE, "photos", "cat.png"),
    ]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TriggerCombined);
    let messages: Vec<String> = err.errors().iter().map(ToString::to_string).collect();
    assert_eq!(messages, vec!["queue handler failed", "storage handler failed"]);
    assert_eq!(err.to_string(), "2 trigger messages failed");
}

#[tokio::test]
async fn test_single_failure_is_rethrown_unchanged() {
    let ok = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(ok.clone())).trigger_id("a"))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![timer_json("a"), timer_json("b"), timer_json("a")]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert!(matches!(
        err,
        RouterError::NoMatchedRoute {
            category: Category::Timer
        }
    ));
    assert_eq!(ok.count(), 2);
}

#[tokio::test]
async fn test_failures_do_not_stop_later_messages() {
    let failing = FailingHandler::new("boom");
    let recorder = RecordingHandler::<QueueMessage>::new();
    let dispatcher = Dispatcher::builder()
        .queue(QueueRoute::new(boxed(failing.clone())).queue_id("bad"))
        .queue(QueueRoute::new(boxed(recorder.clone())))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![
        queue_json("bad", "1"),
        queue_json("good", "2"),
        queue_json("bad", "3"),
        queue_json("good", "4"),
    ]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert_eq!(err.errors().len(), 2);
    assert_eq!(failing.count(), 2);
    let bodies: Vec<_> = recorder
        .events()
        .iter()
        .map(|m| m.body().unwrap_or_default().to_string())
        .collect();
    assert_eq!(bodies, vec!["2", "4"]);
}

#[tokio::test]
async fn test_unknown_message_type_fails_only_that_message() {
    let timer = CountingHandler::new();
    let logger = RecordingLogger::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(timer.clone())))
        .error_policy(rethrowing())
        .logger(logger.clone())
        .build();

    let unknown = json!({
        "event_metadata": { "event_type": "yandex.cloud.events.ydb.ChangefeedMessage" },
        "details": {}
    });
    let payload = batch(vec![unknown, timer_json("t")]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownMessageType);
    assert_eq!(
        err.to_string(),
        "unknown message type: yandex.cloud.events.ydb.ChangefeedMessage"
    );
    assert_eq!(timer.count(), 1);

    let warnings = logger.at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("index"), Some(&json!(0)));
    assert_eq!(logger.at(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_untagged_message_fails_only_that_message() {
    let timer = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(timer.clone())))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![timer_json("t1"), json!({ "details": {} }), timer_json("t2")]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert!(matches!(
        err,
        RouterError::UnknownMessageType { ref event_type } if event_type.is_empty()
    ));
    assert_eq!(timer.count(), 2);
}

#[tokio::test]
async fn test_malformed_details_fail_only_that_message() {
    let timer = CountingHandler::new();
    let logger = RecordingLogger::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(timer.clone())))
        .error_policy(rethrowing())
        .logger(logger.clone())
        .build();

    let broken = json!({
        "event_metadata": { "event_type": event_type::TIMER },
        "details": {}
    });
    let payload = batch(vec![timer_json("t1"), broken, timer_json("t2")]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(err.to_string().contains("trigger_id"));
    assert_eq!(timer.count(), 2);

    let warnings = logger.at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("index"), Some(&json!(1)));
}

#[tokio::test]
async fn test_bad_messages_combine_with_handler_failures() {
    let timer = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(boxed(timer.clone())))
        .queue(QueueRoute::new(boxed(FailingHandler::new("queue handler failed"))))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![
        json!({ "details": {} }),
        timer_json("t1"),
        queue_json("orders", "x"),
        json!({ "event_metadata": { "event_type": event_type::IOT_MESSAGE }, "details": {} }),
    ]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TriggerCombined);
    let kinds: Vec<_> = err.errors().iter().map(RouterError::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::UnknownMessageType,
            ErrorKind::Handler,
            ErrorKind::InvalidRequest
        ]
    );
    assert_eq!(timer.count(), 1);
}

#[tokio::test]
async fn test_queue_json_and_pattern_filters() {
    let dispatcher = Dispatcher::builder()
        .queue(QueueRoute::new(respond(200, "order")).json(json!({ "kind": "order" })))
        .queue(QueueRoute::new(respond(200, "refund")).pattern(Regex::new("refund").unwrap()))
        .error_policy(rethrowing())
        .build();

    let payload = batch(vec![
        queue_json("q", r#"{"kind":"order","items":[1,2]}"#),
        queue_json("q", "refund #12"),
    ]);
    assert!(dispatcher.dispatch_value(payload, &ctx()).await.is_ok());

    let payload = batch(vec![queue_json("q", r#"{"kind":"ord"#)]);
    let err = dispatcher.dispatch_value(payload, &ctx()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchedRoute);
}

#[tokio::test]
async fn test_storage_lifecycle_routes() {
    let created = CountingHandler::new();
    let deleted = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .storage(StorageRoute::new(boxed(created.clone())).event(StorageEventType::Create))
        .storage(StorageRoute::new(boxed(deleted.clone())).event(StorageEventType::Delete))
        .build();

    let payload = batch(vec![
        storage_json(event_type::OBJECT_CREATE, "b", "1"),
        storage_json(event_type::OBJECT_DELETE, "b", "1"),
        storage_json(event_type::OBJECT_DELETE, "b", "2"),
    ]);
    dispatcher.dispatch_value(payload, &ctx()).await.unwrap();

    assert_eq!(created.count(), 1);
    assert_eq!(deleted.count(), 2);
}

#[tokio::test]
async fn test_trigger_results_are_discarded() {
    let dispatcher = Dispatcher::builder()
        .timer(TimerRoute::new(respond(500, "ignored")))
        .build();

    let result = dispatcher
        .dispatch_value(batch(vec![timer_json("t")]), &ctx())
        .await
        .unwrap();
    assert_eq!(result, Some(HttpResult::new(200)));
}
