//! HTTP dispatch: route selection order, filters and result normalization.

mod common;

use common::{ctx, json_post, respond};
use funcroute::{
    Dispatcher, Envelope, ErrorKind, ErrorPolicy, HttpEvent, HttpResult, HttpRoute,
    InvocationContext, ParamPredicate, SyncHandler, boxed, testing::CountingHandler,
};
use regex::Regex;
use serde_json::json;

async fn dispatch(dispatcher: &Dispatcher, event: HttpEvent) -> Option<HttpResult> {
    dispatcher
        .dispatch(&Envelope::Http(event), &ctx())
        .await
        .unwrap()
}

fn update_then_fallback(b: &CountingHandler, a: &CountingHandler) -> Dispatcher {
    Dispatcher::builder()
        .http(
            HttpRoute::new(boxed(b.clone()))
                .methods(["POST"])
                .json(json!({ "type": "update" })),
        )
        .http(HttpRoute::new(boxed(a.clone())))
        .build()
}

#[tokio::test]
async fn test_json_body_selects_specific_route() {
    let b = CountingHandler::new();
    let a = CountingHandler::new();
    let dispatcher = update_then_fallback(&b, &a);

    dispatch(&dispatcher, json_post(r#"{"type":"update","x":1}"#)).await;

    assert_eq!(b.count(), 1);
    assert_eq!(a.count(), 0);
}

#[tokio::test]
async fn test_malformed_json_falls_through() {
    let b = CountingHandler::new();
    let a = CountingHandler::new();
    let dispatcher = update_then_fallback(&b, &a);

    dispatch(&dispatcher, json_post(r#"{"type":"update""#)).await;

    assert_eq!(b.count(), 0);
    assert_eq!(a.count(), 1);
}

#[tokio::test]
async fn test_json_filter_requires_content_type() {
    let b = CountingHandler::new();
    let a = CountingHandler::new();
    let dispatcher = update_then_fallback(&b, &a);

    let event = HttpEvent::new("POST")
        .with_header("Content-Type", "text/plain")
        .with_body(r#"{"type":"update"}"#);
    dispatch(&dispatcher, event).await;

    assert_eq!(b.count(), 0);
    assert_eq!(a.count(), 1);
}

#[tokio::test]
async fn test_lowest_index_route_wins() {
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(201, "first")).methods(["get"]))
        .http(HttpRoute::new(respond(202, "second")))
        .http(HttpRoute::new(respond(203, "third")).methods(["GET"]))
        .build();

    let result = dispatch(&dispatcher, HttpEvent::new("GET")).await.unwrap();
    assert_eq!(result.body.as_deref(), Some("first"));

    let result = dispatch(&dispatcher, HttpEvent::new("DELETE")).await.unwrap();
    assert_eq!(result.body.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_non_overlapping_routes_are_order_independent() {
    let forward = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "get")).methods(["GET"]))
        .http(HttpRoute::new(respond(200, "put")).methods(["PUT"]))
        .build();
    let reversed = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "put")).methods(["PUT"]))
        .http(HttpRoute::new(respond(200, "get")).methods(["GET"]))
        .build();

    for method in ["GET", "PUT"] {
        let a = dispatch(&forward, HttpEvent::new(method)).await;
        let b = dispatch(&reversed, HttpEvent::new(method)).await;
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_query_params() {
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "exact")).param("Action", ParamPredicate::exact("list")))
        .http(HttpRoute::new(respond(200, "substring")).param("q", ParamPredicate::substring("cat")))
        .http(
            HttpRoute::new(respond(200, "regexp"))
                .param("id", ParamPredicate::regexp("^[0-9]+$").unwrap()),
        )
        .http(HttpRoute::new(respond(200, "fallback")))
        .build();

    let cases = [
        (HttpEvent::new("GET").with_query("action", "list"), "exact"),
        (HttpEvent::new("GET").with_query("Q", "concatenate"), "substring"),
        (HttpEvent::new("GET").with_query("id", "42"), "regexp"),
        (HttpEvent::new("GET").with_query("id", "4x2"), "fallback"),
    ];
    for (event, expected) in cases {
        let result = dispatch(&dispatcher, event).await.unwrap();
        assert_eq!(result.body.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_empty_substring_never_matches() {
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "substring")).param("q", ParamPredicate::substring("")))
        .http(HttpRoute::new(respond(200, "fallback")))
        .build();

    for value in ["", "anything"] {
        let event = HttpEvent::new("GET").with_query("q", value);
        let result = dispatch(&dispatcher, event).await.unwrap();
        assert_eq!(result.body.as_deref(), Some("fallback"));
    }
}

#[tokio::test]
async fn test_undefined_regexp_never_matches() {
    let predicate: ParamPredicate = serde_json::from_value(json!({ "type": "regexp" })).unwrap();
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "regexp")).param("q", predicate))
        .http(HttpRoute::new(respond(200, "fallback")))
        .build();

    let result = dispatch(&dispatcher, HttpEvent::new("GET").with_query("q", "x"))
        .await
        .unwrap();
    assert_eq!(result.body.as_deref(), Some("fallback"));
}

#[tokio::test]
async fn test_unsupported_predicate_aborts_dispatch() {
    let predicate: ParamPredicate =
        serde_json::from_value(json!({ "type": "prefix", "value": "a" })).unwrap();
    let fallback = CountingHandler::new();
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "bad")).param("q", predicate))
        .http(HttpRoute::new(boxed(fallback.clone())))
        .error_policy(ErrorPolicy::new())
        .build();

    let err = dispatcher
        .dispatch(&Envelope::Http(HttpEvent::new("GET").with_query("q", "a")), &ctx())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedParamPredicateType);
    assert_eq!(err.to_string(), "unsupported param predicate type: prefix");
    assert_eq!(fallback.count(), 0);
}

#[tokio::test]
async fn test_body_pattern_route() {
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(respond(200, "ping")).pattern(Regex::new("^ping$").unwrap()))
        .http(HttpRoute::new(respond(200, "fallback")))
        .build();

    let result = dispatch(&dispatcher, HttpEvent::new("POST").with_base64_body("ping"))
        .await
        .unwrap();
    assert_eq!(result.body.as_deref(), Some("ping"));
}

#[tokio::test]
async fn test_handler_output_normalization() {
    let dispatcher = Dispatcher::builder()
        .http(
            HttpRoute::new(boxed(SyncHandler::new(
                |_event: HttpEvent, _ctx: InvocationContext| "plain text",
            )))
            .methods(["GET"]),
        )
        .http(
            HttpRoute::new(boxed(|_event: HttpEvent, _ctx: InvocationContext| async {}))
                .methods(["DELETE"]),
        )
        .build();

    let result = dispatch(&dispatcher, HttpEvent::new("GET")).await.unwrap();
    assert_eq!(result.status_code, 200);
    assert_eq!(result.body.as_deref(), Some("plain text"));

    assert_eq!(dispatch(&dispatcher, HttpEvent::new("DELETE")).await, None);
}

#[tokio::test]
async fn test_handler_sees_event_and_context() {
    let dispatcher = Dispatcher::builder()
        .http(HttpRoute::new(boxed(
            |event: HttpEvent, ctx: InvocationContext| async move {
                HttpResult::json(
                    200,
                    &json!({ "path": event.path, "request": ctx.request_id() }),
                )
            },
        )))
        .build();

    let result = dispatch(&dispatcher, HttpEvent::new("GET").with_path("/users/7"))
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(result.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "path": "/users/7", "request": "test-request" }));
    assert_eq!(result.header("content-type"), Some("application/json"));
}
