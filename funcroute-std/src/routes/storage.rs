use crate::predicate::exact;
use funcroute_core::{
    BoxHandler, Category, Predicate, Route, RouterError, StorageMessage, event_type,
};
use serde::Deserialize;

/// Object lifecycle transition a storage route listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageEventType {
    /// Object created.
    Create,
    /// Object overwritten.
    Update,
    /// Object removed.
    Delete,
}

impl StorageEventType {
    /// The `event_type` tag notifications of this kind carry.
    pub const fn event_type(self) -> &'static str {
        match self {
            StorageEventType::Create => event_type::OBJECT_CREATE,
            StorageEventType::Update => event_type::OBJECT_UPDATE,
            StorageEventType::Delete => event_type::OBJECT_DELETE,
        }
    }
}

/// Route for object-storage notifications.
pub struct StorageRoute {
    event: Option<StorageEventType>,
    bucket_id: Option<String>,
    object_id: Option<String>,
    handler: BoxHandler<StorageMessage>,
}

impl StorageRoute {
    /// A route matching every storage notification.
    pub fn new(handler: BoxHandler<StorageMessage>) -> Self {
        Self {
            event: None,
            bucket_id: None,
            object_id: None,
            handler,
        }
    }

    /// Restricts the route to one lifecycle transition.
    pub fn event(mut self, event: StorageEventType) -> Self {
        self.event = Some(event);
        self
    }

    /// Restricts the route to one bucket.
    pub fn bucket_id(mut self, bucket_id: impl Into<String>) -> Self {
        self.bucket_id = Some(bucket_id.into());
        self
    }

    /// Restricts the route to one object key.
    pub fn object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    fn matches_event(&self, event: &StorageMessage) -> Result<bool, RouterError> {
        Ok(exact(
            self.event.map(StorageEventType::event_type),
            &event.event_metadata.event_type,
        ))
    }

    fn matches_bucket(&self, event: &StorageMessage) -> Result<bool, RouterError> {
        Ok(exact(self.bucket_id.as_deref(), &event.details.bucket_id))
    }

    fn matches_object(&self, event: &StorageMessage) -> Result<bool, RouterError> {
        Ok(exact(self.object_id.as_deref(), &event.details.object_id))
    }
}

impl Route for StorageRoute {
    type Event = StorageMessage;

    const CATEGORY: Category = Category::ObjectStorage;
    const PREDICATES: &'static [Predicate<Self, StorageMessage>] = &[
        Self::matches_event,
        Self::matches_bucket,
        Self::matches_object,
    ];

    fn handler(&self) -> &BoxHandler<StorageMessage> {
        &self.handler
    }
}
