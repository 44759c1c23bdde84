//! # Route Tables
//!
//! A [`RouteTable`] is an ordered, immutable list of routes of one kind. It
//! selects the first route whose predicates all hold and drives its handler.
//!
//! # Route kinds
//!
//! | Kind | Event | Filters |
//! |------|-------|---------|
//! | [`HttpRoute`] | [`HttpEvent`](funcroute_core::HttpEvent) | method, query params, body |
//! | [`TimerRoute`] | [`TimerMessage`](funcroute_core::TimerMessage) | trigger id |
//! | [`QueueRoute`] | [`QueueMessage`](funcroute_core::QueueMessage) | queue id, json body, body regex |
//! | [`StorageRoute`] | [`StorageMessage`](funcroute_core::StorageMessage) | lifecycle type, bucket id, object id |
//! | [`IotRoute`] | [`IotMessage`](funcroute_core::IotMessage) | registry id, device id, mqtt topic |

mod http;
mod iot;
mod queue;
mod storage;
mod timer;

pub use http::{BodyFilter, HttpRoute};
pub use iot::IotRoute;
pub use queue::QueueRoute;
pub use storage::{StorageEventType, StorageRoute};
pub use timer::TimerRoute;

use funcroute_core::{HttpResult, InvocationContext, Route, Router, RouterError};

/// First-match-wins scanner over routes of one kind.
pub struct RouteTable<R> {
    routes: Vec<R>,
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<R> From<Vec<R>> for RouteTable<R> {
    fn from(routes: Vec<R>) -> Self {
        Self { routes }
    }
}

impl<R> FromIterator<R> for RouteTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl<R> RouteTable<R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route; earlier routes take precedence.
    pub fn push(&mut self, route: R) {
        self.routes.push(route);
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in precedence order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.routes.iter()
    }
}

impl<R: Route> RouteTable<R> {
    /// Returns the lowest-index route whose predicates all hold.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error; the scan stops there.
    pub fn select(&self, event: &R::Event) -> Result<Option<&R>, RouterError> {
        self.select_where(event, |_| true)
    }

    /// Like [`RouteTable::select`], restricted to routes accepted by `eligible`.
    pub fn select_where(
        &self,
        event: &R::Event,
        eligible: impl Fn(&R) -> bool,
    ) -> Result<Option<&R>, RouterError> {
        for (index, route) in self.routes.iter().enumerate() {
            if !eligible(route) {
                continue;
            }
            if route.matches(event)? {
                #[cfg(feature = "tracing")]
                tracing::debug!(category = %R::CATEGORY, index, "route matched");
                #[cfg(not(feature = "tracing"))]
                let _ = index;
                return Ok(Some(route));
            }
        }
        Ok(None)
    }
}

/// Invokes a selected route's handler with owned copies of the event and
/// context.
pub async fn invoke<R: Route>(
    route: &R,
    event: &R::Event,
    ctx: &InvocationContext,
) -> Result<Option<HttpResult>, RouterError> {
    route
        .handler()
        .call_dyn(event.clone(), ctx.clone())
        .await
        .map_err(RouterError::Handler)
}

impl<R: Route> Router<R::Event> for RouteTable<R> {
    async fn route(
        &self,
        event: &R::Event,
        ctx: &InvocationContext,
    ) -> Result<Option<HttpResult>, RouterError> {
        let route = self
            .select(event)?
            .ok_or_else(|| RouterError::no_matched_route(R::CATEGORY))?;
        invoke(route, event, ctx).await
    }
}
