//! # Dispatcher
//!
//! The single entry point of an invocation. A [`Dispatcher`] classifies the
//! envelope, routes it through the route table of its category, aggregates
//! per-message trigger failures and finally applies the error policy.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder()
//!     .http(HttpRoute::new(boxed(create_user)).methods(["POST"]))
//!     .queue(QueueRoute::new(boxed(on_order)).queue_id("orders"))
//!     .cors(CorsConfig::enabled())
//!     .build();
//!
//! let result = dispatcher.dispatch_value(payload, ctx).await?;
//! ```

use crate::policy::{ErrorPolicy, default_response};
use funcroute_core::{
    Envelope, HttpEvent, HttpResult, InvocationContext, LogLevel, LogRecord, Logger, Router,
    RouterError, TriggerEvent, TriggerMessage,
};
use funcroute_std::{
    Cors, CorsConfig, HttpRoute, IotRoute, QueueRoute, RouteTable, StorageRoute, TimerRoute,
    default_logger, routes::invoke,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Routes envelopes to handlers.
///
/// Immutable once built; share it behind an `Arc` across invocations.
pub struct Dispatcher {
    http: RouteTable<HttpRoute>,
    timer: RouteTable<TimerRoute>,
    queue: RouteTable<QueueRoute>,
    storage: RouteTable<StorageRoute>,
    iot: RouteTable<IotRoute>,
    cors: Option<Cors>,
    error_policy: Option<ErrorPolicy>,
    logger: Arc<dyn Logger>,
}

impl Dispatcher {
    /// Starts an empty configuration.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// The resolved CORS policy, if enabled.
    pub fn cors(&self) -> Option<&Cors> {
        self.cors.as_ref()
    }

    /// Classifies a raw JSON payload and dispatches it.
    ///
    /// Classification failures go through the error policy like every other
    /// dispatch error.
    pub async fn dispatch_value(
        &self,
        payload: Value,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        match Envelope::from_value(payload) {
            Ok(envelope) => self.dispatch(&envelope, ctx).await,
            Err(error) => self.recover(error, ctx).await,
        }
    }

    /// Dispatches one envelope.
    ///
    /// HTTP envelopes yield the handler's result, CORS-decorated. Trigger
    /// envelopes yield `200` once every sub-message has been routed without
    /// error.
    ///
    /// # Errors
    ///
    /// The dispatch error when the error policy does not turn it into a
    /// result.
    pub async fn dispatch(
        &self,
        envelope: &Envelope,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        let outcome = match envelope {
            Envelope::Http(event) => self.dispatch_http(event, ctx).await,
            Envelope::Trigger(event) => self.dispatch_trigger(event, ctx).await,
        };
        match outcome {
            Ok(result) => Ok(result),
            Err(error) => self.recover(error, ctx).await,
        }
    }

    async fn dispatch_http(
        &self,
        event: &HttpEvent,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        self.log(
            LogLevel::Info,
            ctx,
            "dispatching http request",
            &[
                ("method", json!(event.method())),
                ("path", json!(event.path)),
            ],
        );

        let Some(cors) = &self.cors else {
            return self.http.route(event, ctx).await;
        };

        if Cors::is_preflight(event) {
            let explicit = self
                .http
                .select_where(event, |route| route.declares_method("OPTIONS"))?;
            if let Some(route) = explicit {
                return invoke(route, event, ctx).await;
            }
            let result = cors.preflight(event);
            self.log(
                LogLevel::Info,
                ctx,
                "answered cors preflight",
                &[
                    ("origin", json!(event.header("origin"))),
                    ("allowed", json!(result.headers.is_some())),
                ],
            );
            return Ok(Some(result));
        }

        let result = self.http.route(event, ctx).await?;
        Ok(result.map(|result| cors.decorate(event, result)))
    }

    async fn dispatch_trigger(
        &self,
        event: &TriggerEvent,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        let mut errors = Vec::new();

        for (index, message) in event.messages.iter().enumerate() {
            self.log(
                LogLevel::Info,
                ctx,
                "dispatching trigger message",
                &[
                    ("index", json!(index)),
                    ("event_type", json!(message.event_type())),
                ],
            );
            if let Err(error) = self.route_message(message, ctx).await {
                self.log(
                    LogLevel::Warn,
                    ctx,
                    "trigger message failed",
                    &[
                        ("index", json!(index)),
                        ("event_type", json!(message.event_type())),
                        ("kind", json!(error.kind().as_str())),
                        ("error", json!(error.to_string())),
                    ],
                );
                errors.push(error);
            }
        }

        RouterError::aggregate(errors)?;
        Ok(Some(HttpResult::new(200)))
    }

    async fn route_message(
        &self,
        message: &TriggerMessage,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        match message {
            TriggerMessage::Timer(m) => self.timer.route(m, ctx).await,
            TriggerMessage::Queue(m) => self.queue.route(m, ctx).await,
            TriggerMessage::Storage(m) => self.storage.route(m, ctx).await,
            TriggerMessage::Iot(m) => self.iot.route(m, ctx).await,
            TriggerMessage::Unrecognized(m) => Err(RouterError::UnknownMessageType {
                event_type: m.event_metadata.event_type.clone(),
            }),
            TriggerMessage::Malformed(m) => Err(RouterError::invalid_request(format!(
                "malformed {} message: {}",
                m.event_metadata.event_type, m.reason
            ))),
        }
    }

    async fn recover(
        &self,
        error: RouterError,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        let kind = error.kind();
        let recovered = match &self.error_policy {
            None => default_response(&error).map(Some).ok_or(error),
            Some(policy) => match policy.handler_for(&error) {
                Some(handler) => handler
                    .handle(error, ctx.clone())
                    .await
                    .map_err(RouterError::Handler),
                None => Err(error),
            },
        };

        match &recovered {
            Ok(_) => self.log(
                LogLevel::Info,
                ctx,
                "dispatch error handled",
                &[("kind", json!(kind.as_str()))],
            ),
            Err(error) => self.log(
                LogLevel::Error,
                ctx,
                "dispatch failed",
                &[
                    ("kind", json!(error.kind().as_str())),
                    ("error", json!(error.to_string())),
                ],
            ),
        }
        recovered
    }

    fn log(&self, level: LogLevel, ctx: &InvocationContext, message: &str, fields: &[(&str, Value)]) {
        self.logger.log(&LogRecord {
            level,
            request_id: ctx.request_id(),
            message,
            fields,
        });
    }
}

impl Router<Envelope> for Dispatcher {
    async fn route(
        &self,
        event: &Envelope,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        self.dispatch(event, ctx).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("http", &self.http.len())
            .field("timer", &self.timer.len())
            .field("queue", &self.queue.len())
            .field("storage", &self.storage.len())
            .field("iot", &self.iot.len())
            .field("cors", &self.cors)
            .field("error_policy", &self.error_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Dispatcher`].
///
/// Routes are kept in insertion order per category; earlier routes win.
pub struct DispatcherBuilder {
    http: RouteTable<HttpRoute>,
    timer: RouteTable<TimerRoute>,
    queue: RouteTable<QueueRoute>,
    storage: RouteTable<StorageRoute>,
    iot: RouteTable<IotRoute>,
    cors: Option<CorsConfig>,
    error_policy: Option<ErrorPolicy>,
    logger: Option<Arc<dyn Logger>>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            http: RouteTable::new(),
            timer: RouteTable::new(),
            queue: RouteTable::new(),
            storage: RouteTable::new(),
            iot: RouteTable::new(),
            cors: None,
            error_policy: None,
            logger: None,
        }
    }

    /// Append an HTTP route.
    pub fn http(mut self, route: HttpRoute) -> Self {
        self.http.push(route);
        self
    }

    /// Append a timer route.
    pub fn timer(mut self, route: TimerRoute) -> Self {
        self.timer.push(route);
        self
    }

    /// Append a message-queue route.
    pub fn queue(mut self, route: QueueRoute) -> Self {
        self.queue.push(route);
        self
    }

    /// Append an object-storage route.
    pub fn storage(mut self, route: StorageRoute) -> Self {
        self.storage.push(route);
        self
    }

    /// Append an IoT route.
    pub fn iot(mut self, route: IotRoute) -> Self {
        self.iot.push(route);
        self
    }

    /// Set the CORS configuration.
    pub fn cors(mut self, config: CorsConfig) -> Self {
        self.cors = Some(config);
        self
    }

    /// Set the error policy. Without one, built-in defaults apply.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    /// Set the logger. Defaults to [`funcroute_std::default_logger`].
    pub fn logger<L: Logger>(mut self, logger: L) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(logger);
        self.logger = Some(logger);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            http: self.http,
            timer: self.timer,
            queue: self.queue,
            storage: self.storage,
            iot: self.iot,
            cors: self.cors.and_then(Cors::new),
            error_policy: self.error_policy,
            logger: self.logger.unwrap_or_else(default_logger),
        }
    }
}
