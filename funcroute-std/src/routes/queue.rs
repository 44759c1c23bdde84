use crate::predicate::{body_pattern_matches, exact, json_body_matches};
use funcroute_core::{BoxHandler, Category, Predicate, QueueMessage, Route, RouterError};
use regex::Regex;
use serde_json::Value;

/// Route for message-queue deliveries.
pub struct QueueRoute {
    queue_id: Option<String>,
    json: Option<Value>,
    pattern: Option<Regex>,
    handler: BoxHandler<QueueMessage>,
}

impl QueueRoute {
    /// A route matching every delivery.
    pub fn new(handler: BoxHandler<QueueMessage>) -> Self {
        Self {
            queue_id: None,
            json: None,
            pattern: None,
            handler,
        }
    }

    /// Restricts the route to one queue.
    pub fn queue_id(mut self, queue_id: impl Into<String>) -> Self {
        self.queue_id = Some(queue_id.into());
        self
    }

    /// Requires a JSON body structurally containing `pattern`.
    pub fn json(mut self, pattern: Value) -> Self {
        self.json = Some(pattern);
        self
    }

    /// Requires the raw body to match `pattern`.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn matches_queue(&self, event: &QueueMessage) -> Result<bool, RouterError> {
        Ok(exact(self.queue_id.as_deref(), &event.details.queue_id))
    }

    fn matches_json(&self, event: &QueueMessage) -> Result<bool, RouterError> {
        match &self.json {
            Some(pattern) => json_body_matches(event.body(), pattern),
            None => Ok(true),
        }
    }

    fn matches_pattern(&self, event: &QueueMessage) -> Result<bool, RouterError> {
        Ok(self
            .pattern
            .as_ref()
            .is_none_or(|pattern| body_pattern_matches(event.body(), pattern)))
    }
}

impl Route for QueueRoute {
    type Event = QueueMessage;

    const CATEGORY: Category = Category::MessageQueue;
    const PREDICATES: &'static [Predicate<Self, QueueMessage>] = &[
        Self::matches_queue,
        Self::matches_json,
        Self::matches_pattern,
    ];

    fn handler(&self) -> &BoxHandler<QueueMessage> {
        &self.handler
    }
}
