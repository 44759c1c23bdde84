//! Message trait for routable event types.

/// A marker trait for envelopes and sub-messages that can be routed.
///
/// Messages must be `Clone + Send + Sync + 'static`: route tables are shared
/// across concurrent dispatch calls, and every handler receives its own copy
/// of the event it was selected for.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct DeployEvent { id: u64 }
///
/// impl Message for DeployEvent {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Routed events are cloned into handlers and must be thread-safe."
)]
pub trait Message: Clone + Send + Sync + 'static {}

impl Message for String {}
impl Message for serde_json::Value {}
