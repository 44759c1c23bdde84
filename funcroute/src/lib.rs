//! # funcroute - Event Dispatch for Serverless Functions
//!
//! `funcroute` routes one function invocation, an HTTP call or a batch of
//! trigger messages, to the handler of the first route whose filters all
//! hold.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use funcroute::prelude::*;
//!
//! let dispatcher = Dispatcher::builder()
//!     .http(
//!         HttpRoute::new(boxed(|event: HttpEvent, _ctx: InvocationContext| async move {
//!             HttpResult::new(200).with_body("updated")
//!         }))
//!         .methods(["POST"])
//!         .json(serde_json::json!({ "type": "update" })),
//!     )
//!     .timer(TimerRoute::new(boxed(SyncHandler::new(
//!         |_tick: TimerMessage, _ctx: InvocationContext| {},
//!     ))))
//!     .cors(CorsConfig::enabled().allowed_origins(["https://app.example"]))
//!     .build();
//!
//! let result = dispatcher.dispatch_value(payload, &ctx).await?;
//! ```
//!
//! ## Dispatch
//!
//! - **HTTP**: an explicit `OPTIONS` route, else the CORS preflight answer,
//!   else the first matching HTTP route with its result CORS-decorated.
//! - **Trigger**: every sub-message routed in order; failures are collected
//!   and surfaced as the single error or one combined error.
//! - **Errors**: the [`ErrorPolicy`] turns failures into results; without
//!   one, operational errors become `404`/`400`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatcher;
mod policy;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use policy::{ErrorFuture, ErrorHandler, ErrorMatcher, ErrorPolicy, default_response};

pub use funcroute_core::{
    // Errors
    BoxError,
    // Handlers
    BoxHandler,
    // Envelopes
    Category,
    DynHandler,
    Envelope,
    ErrorKind,
    EventMetadata,
    Handler,
    HandlerFuture,
    HttpEvent,
    // Results
    HttpResult,
    IntoResponse,
    // Context
    InvocationContext,
    IotMessage,
    // Logging
    LogLevel,
    LogRecord,
    Logger,
    Message,
    NoopLogger,
    QueueMessage,
    // Routing
    Route,
    Router,
    RouterError,
    StorageMessage,
    SyncHandler,
    TimerMessage,
    TriggerEvent,
    TriggerMessage,
    boxed,
    event,
    event_type,
};

pub use funcroute_std::{
    BodyFilter, Cors, CorsConfig, EffectiveCors, HttpRoute, IotRoute, ParamPredicate, QueueRoute,
    RouteTable, StorageEventType, StorageRoute, TimerRoute, default_logger, noop_logger,
};

#[cfg(feature = "tracing")]
pub use funcroute_std::TracingLogger;

/// Structural pattern matcher.
pub mod matcher {
    pub use funcroute_std::matcher::matches;
}

/// CORS header names and request checks.
pub mod cors {
    pub use funcroute_std::cors::{
        ALLOW_CREDENTIALS, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN, is_safelisted_header,
        is_simple_request,
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use funcroute_std::testing::*;
}

/// Prelude module - common imports for funcroute.
///
/// # Usage
///
/// ```rust,ignore
/// use funcroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Routes
        BodyFilter,
        // Configuration
        CorsConfig,
        Dispatcher,
        Envelope,
        ErrorKind,
        ErrorMatcher,
        ErrorPolicy,
        // Core traits
        Handler,
        // Envelopes
        HttpEvent,
        HttpResult,
        HttpRoute,
        IntoResponse,
        InvocationContext,
        IotMessage,
        IotRoute,
        ParamPredicate,
        QueueMessage,
        QueueRoute,
        Router,
        // Errors
        RouterError,
        StorageEventType,
        StorageMessage,
        StorageRoute,
        SyncHandler,
        TimerMessage,
        TimerRoute,
        TriggerEvent,
        TriggerMessage,
        boxed,
    };
}
