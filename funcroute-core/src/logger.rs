//! Structured logger collaborator.
//!
//! The dispatcher does not format or emit anything itself. It hands a
//! [`LogRecord`] to a [`Logger`] and the logger decides where it goes.

use serde_json::Value;
use std::fmt;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Normal operation.
    Info,
    /// Recoverable problem.
    Warn,
    /// Failed dispatch.
    Error,
}

impl LogLevel {
    /// Upper-case level name.
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One log record: a level, a correlation id, a message and a flat set of
/// named values.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Severity.
    pub level: LogLevel,
    /// Correlation id, the invocation's request id.
    pub request_id: &'a str,
    /// Free-text message.
    pub message: &'a str,
    /// Named values.
    pub fields: &'a [(&'a str, Value)],
}

impl LogRecord<'_> {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Sink for dispatcher log records.
pub trait Logger: Send + Sync + 'static {
    /// Consumes one record.
    fn log(&self, record: &LogRecord<'_>);
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn log(&self, record: &LogRecord<'_>) {
        (**self).log(record)
    }
}

/// A logger that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _record: &LogRecord<'_>) {}
}
