//! # Handlers
//!
//! A handler is the terminal point of a dispatch: the business logic a route
//! was configured with. Handlers receive an owned copy of the event they were
//! selected for and the invocation context.
//!
//! # Usage Patterns
//!
//! 1. **Async closure**: `|event: HttpEvent, ctx: InvocationContext| async move { ... }`
//! 2. **Sync closure**: `SyncHandler::new(|event: HttpEvent, ctx: InvocationContext| { ... })`
//! 3. **Struct implementation**: `impl Handler<QueueMessage> for MyHandler`
//!
//! Route tables store handlers as [`BoxHandler`], so the routers see a single
//! asynchronous contract regardless of how the handler was written.

use crate::{
    context::InvocationContext,
    error::BoxError,
    message::Message,
    response::{HttpResult, IntoResponse},
};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// The boxed future every handler is driven through.
pub type HandlerFuture<'a> = BoxFuture<'a, Result<Option<HttpResult>, BoxError>>;

/// The business logic attached to a route.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle events of type `{E}`",
    label = "missing `Handler<{E}>` implementation",
    note = "Closures must take `({E}, InvocationContext)` and return a future; wrap synchronous closures in `SyncHandler`."
)]
pub trait Handler<E: Message>: Send + Sync + 'static {
    /// The output type of the handler.
    type Output: IntoResponse;

    /// Executes the handler logic.
    fn call(&self, event: E, ctx: InvocationContext) -> impl Future<Output = Self::Output> + Send;
}

// Blanket impl for async closures
impl<F, E, Out, Fut> Handler<E> for F
where
    E: Message,
    Out: IntoResponse,
    F: Fn(E, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
{
    type Output = Out;

    fn call(&self, event: E, ctx: InvocationContext) -> impl Future<Output = Self::Output> + Send {
        (self)(event, ctx)
    }
}

/// Object-safe version of [`Handler`] with the output already normalized.
pub trait DynHandler<E>: Send + Sync + 'static {
    /// Executes the handler and converts its output.
    fn call_dyn(&self, event: E, ctx: InvocationContext) -> HandlerFuture<'_>;
}

impl<E: Message, H: Handler<E>> DynHandler<E> for H {
    fn call_dyn(&self, event: E, ctx: InvocationContext) -> HandlerFuture<'_> {
        Box::pin(async move { self.call(event, ctx).await.into_response() })
    }
}

/// A shared, type-erased handler as stored in route tables.
pub type BoxHandler<E> = Arc<dyn DynHandler<E>>;

/// Erases a handler's concrete type.
pub fn boxed<E: Message, H: Handler<E>>(handler: H) -> BoxHandler<E> {
    Arc::new(handler)
}

/// Adapts a synchronous closure to the asynchronous [`Handler`] contract.
///
/// # Example
///
/// ```rust,ignore
/// let handler = SyncHandler::new(|event: TimerMessage, _ctx: InvocationContext| {
///     println!("tick from {}", event.details.trigger_id);
/// });
/// ```
pub struct SyncHandler<F> {
    func: F,
}

impl<F> SyncHandler<F> {
    /// Wraps a synchronous function.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, E, Out> Handler<E> for SyncHandler<F>
where
    E: Message,
    Out: IntoResponse,
    F: Fn(E, InvocationContext) -> Out + Send + Sync + 'static,
{
    type Output = Out;

    async fn call(&self, event: E, ctx: InvocationContext) -> Self::Output {
        (self.func)(event, ctx)
    }
}
