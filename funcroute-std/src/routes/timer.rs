use crate::predicate::exact;
use funcroute_core::{BoxHandler, Category, Predicate, Route, RouterError, TimerMessage};

/// Route for timer ticks.
pub struct TimerRoute {
    trigger_id: Option<String>,
    handler: BoxHandler<TimerMessage>,
}

impl TimerRoute {
    /// A route matching every tick.
    pub fn new(handler: BoxHandler<TimerMessage>) -> Self {
        Self {
            trigger_id: None,
            handler,
        }
    }

    /// Restricts the route to one trigger.
    pub fn trigger_id(mut self, trigger_id: impl Into<String>) -> Self {
        self.trigger_id = Some(trigger_id.into());
        self
    }

    /// The trigger id filter, if declared.
    pub fn trigger_id_filter(&self) -> Option<&str> {
        self.trigger_id.as_deref()
    }

    fn matches_trigger(&self, event: &TimerMessage) -> Result<bool, RouterError> {
        Ok(exact(self.trigger_id.as_deref(), &event.details.trigger_id))
    }
}

impl Route for TimerRoute {
    type Event = TimerMessage;

    const CATEGORY: Category = Category::Timer;
    const PREDICATES: &'static [Predicate<Self, TimerMessage>] = &[Self::matches_trigger];

    fn handler(&self) -> &BoxHandler<TimerMessage> {
        &self.handler
    }
}
