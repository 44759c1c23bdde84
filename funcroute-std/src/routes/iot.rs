use crate::predicate::exact;
use funcroute_core::{BoxHandler, Category, IotMessage, Predicate, Route, RouterError};

/// Route for IoT Core messages.
pub struct IotRoute {
    registry_id: Option<String>,
    device_id: Option<String>,
    mqtt_topic: Option<String>,
    handler: BoxHandler<IotMessage>,
}

impl IotRoute {
    /// A route matching every IoT message.
    pub fn new(handler: BoxHandler<IotMessage>) -> Self {
        Self {
            registry_id: None,
            device_id: None,
            mqtt_topic: None,
            handler,
        }
    }

    /// Restricts the route to one registry.
    pub fn registry_id(mut self, registry_id: impl Into<String>) -> Self {
        self.registry_id = Some(registry_id.into());
        self
    }

    /// Restricts the route to one device.
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Restricts the route to one MQTT topic.
    pub fn mqtt_topic(mut self, mqtt_topic: impl Into<String>) -> Self {
        self.mqtt_topic = Some(mqtt_topic.into());
        self
    }

    fn matches_registry(&self, event: &IotMessage) -> Result<bool, RouterError> {
        Ok(exact(self.registry_id.as_deref(), &event.details.registry_id))
    }

    fn matches_device(&self, event: &IotMessage) -> Result<bool, RouterError> {
        Ok(exact(self.device_id.as_deref(), &event.details.device_id))
    }

    fn matches_topic(&self, event: &IotMessage) -> Result<bool, RouterError> {
        Ok(exact(self.mqtt_topic.as_deref(), &event.details.mqtt_topic))
    }
}

impl Route for IotRoute {
    type Event = IotMessage;

    const CATEGORY: Category = Category::IotMessage;
    const PREDICATES: &'static [Predicate<Self, IotMessage>] = &[
        Self::matches_registry,
        Self::matches_device,
        Self::matches_topic,
    ];

    fn handler(&self) -> &BoxHandler<IotMessage> {
        &self.handler
    }
}
