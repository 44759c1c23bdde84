//! Logger implementations.

use funcroute_core::{Logger, NoopLogger};
use std::sync::Arc;

#[cfg(feature = "tracing")]
pub use self::tracing_logger::TracingLogger;

/// The logger a dispatcher uses when none is configured: [`TracingLogger`]
/// with the `tracing` feature, otherwise [`NoopLogger`].
pub fn default_logger() -> Arc<dyn Logger> {
    #[cfg(feature = "tracing")]
    {
        Arc::new(TracingLogger)
    }
    #[cfg(not(feature = "tracing"))]
    {
        Arc::new(NoopLogger)
    }
}

/// A logger that drops everything, shared.
pub fn noop_logger() -> Arc<dyn Logger> {
    Arc::new(NoopLogger)
}

#[cfg(feature = "tracing")]
mod tracing_logger {
    use funcroute_core::{LogLevel, LogRecord, Logger};
    use serde_json::{Map, Value};

    /// Emits records as `tracing` events.
    ///
    /// The request id becomes the `request_id` field and the named values are
    /// rendered as one JSON object in the `fields` field.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TracingLogger;

    impl Logger for TracingLogger {
        fn log(&self, record: &LogRecord<'_>) {
            let fields: Map<String, Value> = record
                .fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect();
            let fields = Value::Object(fields);
            let request_id = record.request_id;
            let message = record.message;

            match record.level {
                LogLevel::Info => tracing::info!(request_id, %fields, "{message}"),
                LogLevel::Warn => tracing::warn!(request_id, %fields, "{message}"),
                LogLevel::Error => tracing::error!(request_id, %fields, "{message}"),
            }
        }
    }
}
