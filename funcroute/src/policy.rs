//! # Error Policy
//!
//! An [`ErrorPolicy`] turns a failed dispatch into a fallback result. It is
//! consulted once, around the whole dispatch:
//!
//! 1. a handler registered for the error's [`ErrorKind`];
//! 2. otherwise the first custom matcher, in declared order, that fires on
//!    the error's message;
//! 3. otherwise the error is returned to the caller.
//!
//! A dispatcher configured without any policy uses [`default_response`]
//! instead.

use funcroute_core::{BoxError, ErrorKind, HttpResult, IntoResponse, InvocationContext, RouterError};
use futures::future::BoxFuture;
use regex::Regex;
use std::{collections::HashMap, future::Future, sync::Arc};

/// The boxed future an [`ErrorHandler`] returns.
pub type ErrorFuture<'a> = BoxFuture<'a, Result<Option<HttpResult>, BoxError>>;

/// Produces a fallback result from a dispatch error.
///
/// Implemented for every `Fn(RouterError, InvocationContext) -> impl Future`
/// whose output is an [`IntoResponse`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle dispatch errors",
    label = "missing `ErrorHandler` implementation",
    note = "Closures must take `(RouterError, InvocationContext)` and return a future."
)]
pub trait ErrorHandler: Send + Sync + 'static {
    /// Handles `error`, taking ownership of it.
    fn handle(&self, error: RouterError, ctx: InvocationContext) -> ErrorFuture<'_>;
}

impl<F, Fut, Out> ErrorHandler for F
where
    F: Fn(RouterError, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoResponse,
{
    fn handle(&self, error: RouterError, ctx: InvocationContext) -> ErrorFuture<'_> {
        Box::pin(async move { (self)(error, ctx).await.into_response() })
    }
}

/// A test on an error's display message.
#[derive(Debug, Clone)]
pub enum ErrorMatcher {
    /// The message equals this string.
    Message(String),
    /// The pattern matches the message.
    Regex(Regex),
}

impl ErrorMatcher {
    /// Whether the matcher fires for `message`.
    pub fn fires(&self, message: &str) -> bool {
        match self {
            ErrorMatcher::Message(expected) => expected == message,
            ErrorMatcher::Regex(pattern) => pattern.is_match(message),
        }
    }
}

/// Caller-supplied handling for dispatch errors.
#[derive(Clone, Default)]
pub struct ErrorPolicy {
    by_kind: HashMap<ErrorKind, Arc<dyn ErrorHandler>>,
    custom: Vec<(ErrorMatcher, Arc<dyn ErrorHandler>)>,
}

impl ErrorPolicy {
    /// A policy that handles nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles every error of `kind` with `handler`, replacing a previous
    /// handler for the same kind.
    pub fn on(mut self, kind: ErrorKind, handler: impl ErrorHandler) -> Self {
        self.by_kind.insert(kind, Arc::new(handler));
        self
    }

    /// Handles errors `matcher` fires on. Matchers are tried in the order
    /// they were added.
    pub fn on_match(mut self, matcher: ErrorMatcher, handler: impl ErrorHandler) -> Self {
        let handler: Arc<dyn ErrorHandler> = Arc::new(handler);
        self.custom.push((matcher, handler));
        self
    }

    /// Handles errors whose message equals `message`.
    pub fn on_message(self, message: impl Into<String>, handler: impl ErrorHandler) -> Self {
        self.on_match(ErrorMatcher::Message(message.into()), handler)
    }

    /// Handles errors whose message matches `pattern`.
    pub fn on_regex(self, pattern: Regex, handler: impl ErrorHandler) -> Self {
        self.on_match(ErrorMatcher::Regex(pattern), handler)
    }

    /// The handler responsible for `error`, if any.
    pub fn handler_for(&self, error: &RouterError) -> Option<&dyn ErrorHandler> {
        if let Some(handler) = self.by_kind.get(&error.kind()) {
            return Some(handler.as_ref());
        }
        let message = error.to_string();
        self.custom
            .iter()
            .find(|(matcher, _)| matcher.fires(&message))
            .map(|(_, handler)| handler.as_ref())
    }
}

impl std::fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorPolicy")
            .field("kinds", &self.by_kind.keys().collect::<Vec<_>>())
            .field(
                "matchers",
                &self.custom.iter().map(|(m, _)| m).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Built-in fallback used when no policy is configured.
///
/// Operational conditions map to client errors; configuration errors,
/// handler failures and combined trigger failures have no default.
pub fn default_response(error: &RouterError) -> Option<HttpResult> {
    let status = match error.kind() {
        ErrorKind::NoMatchedRoute | ErrorKind::UnknownEventType | ErrorKind::UnknownMessageType => {
            404
        }
        ErrorKind::InvalidRequest => 400,
        ErrorKind::UnsupportedParamPredicateType | ErrorKind::TriggerCombined | ErrorKind::Handler => {
            return None;
        }
    };
    Some(HttpResult::new(status).with_body(error.to_string()))
}
