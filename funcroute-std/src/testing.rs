//! Testing utilities for funcroute.
//!
//! Shared-state doubles for the collaborators a dispatch touches.
//!
//! # Features
//!
//! - [`RecordingLogger`]: a logger that keeps every record it receives
//! - [`CountingHandler`]: a handler that counts its invocations
//! - [`RecordingHandler`]: a handler that keeps every event it receives
//! - [`FailingHandler`]: a handler that always fails with [`HandlerFailure`]
//!
//! All of them are cheap to clone; clones share state, so keep one clone for
//! assertions and hand the other to a route.

use funcroute_core::{Handler, HttpResult, InvocationContext, LogLevel, LogRecord, Logger, Message};
use serde_json::Value;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Logger
// ============================================================================

/// An owned copy of a [`LogRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLog {
    /// Severity.
    pub level: LogLevel,
    /// Correlation id.
    pub request_id: String,
    /// Message.
    pub message: String,
    /// Named values.
    pub fields: Vec<(String, Value)>,
}

impl RecordedLog {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// A logger that records every record it receives.
///
/// # Example
///
/// ```rust,ignore
/// let logger = RecordingLogger::new();
/// let dispatcher = Dispatcher::builder().logger(logger.clone()).build();
///
/// dispatcher.dispatch(&envelope, &ctx).await?;
/// assert_eq!(logger.at(LogLevel::Info).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<RecordedLog>>>,
}

impl RecordingLogger {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the recorded logs.
    pub fn records(&self) -> Vec<RecordedLog> {
        lock(&self.records).clone()
    }

    /// Recorded logs of one level.
    pub fn at(&self, level: LogLevel) -> Vec<RecordedLog> {
        lock(&self.records)
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }

    /// Get the number of recorded logs.
    pub fn count(&self) -> usize {
        lock(&self.records).len()
    }

    /// Clear all recorded logs.
    pub fn clear(&self) {
        lock(&self.records).clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, record: &LogRecord<'_>) {
        lock(&self.records).push(RecordedLog {
            level: record.level,
            request_id: record.request_id.to_string(),
            message: record.message.to_string(),
            fields: record
                .fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
        });
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts how many times it was invoked.
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// let route = HttpRoute::new(boxed(counter.clone()));
///
/// // Dispatch...
///
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    response: Option<HttpResult>,
}

impl CountingHandler {
    /// Create a counter that produces no result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter that returns `response` on every call.
    pub fn with_response(response: HttpResult) -> Self {
        Self {
            count: Arc::default(),
            response: Some(response),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<E: Message> Handler<E> for CountingHandler {
    type Output = Option<HttpResult>;

    async fn call(&self, _event: E, _ctx: InvocationContext) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the events it receives, in order.
#[derive(Debug)]
pub struct RecordingHandler<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> RecordingHandler<E> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Clone> RecordingHandler<E> {
    /// Get a copy of the recorded events.
    pub fn events(&self) -> Vec<E> {
        lock(&self.events).clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        lock(&self.events).len()
    }
}

impl<E> Default for RecordingHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RecordingHandler<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<E: Message> Handler<E> for RecordingHandler<E> {
    type Output = ();

    async fn call(&self, event: E, _ctx: InvocationContext) -> Self::Output {
        lock(&self.events).push(event);
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// The error a [`FailingHandler`] produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerFailure(pub String);

/// A handler that fails every call with [`HandlerFailure`].
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
    count: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            count: Arc::default(),
        }
    }

    /// Get the number of attempted calls.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<E: Message> Handler<E> for FailingHandler {
    type Output = Result<(), HandlerFailure>;

    async fn call(&self, _event: E, _ctx: InvocationContext) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        Err(HandlerFailure(self.message.clone()))
    }
}
