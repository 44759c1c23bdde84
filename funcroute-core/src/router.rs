//! # Routing Contracts
//!
//! A [`Route`] pairs a list of predicates with a handler. A [`Router`] takes an
//! event of one category, selects a route for it and drives the handler.
//!
//! # Predicates
//!
//! Each route kind declares its filters as a static slice of pure predicate
//! functions. [`Route::matches`] evaluates them in declared order and stops at
//! the first one that does not hold. A predicate returns `Ok(false)` for an
//! expected mismatch (absent header, unparsable body) and `Err` only for
//! conditions that must abort the whole dispatch, such as a route declaring an
//! unsupported filter.

use crate::{
    context::InvocationContext,
    error::RouterError,
    event::Category,
    handler::BoxHandler,
    message::Message,
    response::HttpResult,
};
use std::future::Future;

/// One filter of a route kind, evaluated against an event.
pub type Predicate<R, E> = fn(&R, &E) -> Result<bool, RouterError>;

/// A route descriptor: optional filters plus exactly one handler.
pub trait Route: Send + Sync + 'static {
    /// The event this route kind filters.
    type Event: Message;

    /// Category reported when no route of this kind matches.
    const CATEGORY: Category;

    /// Filters in evaluation order.
    const PREDICATES: &'static [Predicate<Self, Self::Event>];

    /// The handler invoked when every predicate holds.
    fn handler(&self) -> &BoxHandler<Self::Event>;

    /// Short-circuiting conjunction of [`Route::PREDICATES`].
    fn matches(&self, event: &Self::Event) -> Result<bool, RouterError>
    where
        Self: Sized,
    {
        for predicate in Self::PREDICATES {
            if !predicate(self, event)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Selects a route for an event and invokes its handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot route events of type `{E}`",
    label = "missing `Router` implementation",
    note = "Implement `Router<{E}>` to handle event routing."
)]
pub trait Router<E: Message>: Send + Sync {
    /// Routes `event`, returning the handler's normalized result.
    fn route(
        &self,
        event: &E,
        ctx: &InvocationContext,
    ) -> impl Future<Output = Result<Option<HttpResult>, RouterError>> + Send;
}
