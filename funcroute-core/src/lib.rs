//! # funcroute-core
//!
//! Core contracts for the funcroute serverless event dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by code
//! that only declares handlers or inspects envelopes, without pulling in the
//! route tables and matchers of `funcroute-std`.
//!
//! # Contents
//!
//! - **Envelopes** ([`Envelope`], [`HttpEvent`], [`TriggerEvent`], [`TriggerMessage`]):
//!   the invocation payloads, classified by shape.
//! - **Handlers** ([`Handler`], [`DynHandler`], [`SyncHandler`]): business logic
//!   attached to routes, normalized to one asynchronous contract.
//! - **Results** ([`HttpResult`], [`IntoResponse`]): the result shape returned to
//!   the gateway and the conversion from handler outputs.
//! - **Routing** ([`Route`], [`Router`]): route descriptors as predicate lists and
//!   the routers that select among them.
//! - **Logging** ([`Logger`], [`LogRecord`]): the structured logger collaborator.
//!
//! # Error Types
//!
//! - [`RouterError`] - every failure a dispatch can produce
//! - [`ErrorKind`] - its discriminator

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
pub mod event;
mod handler;
mod logger;
mod message;
mod response;
mod router;
mod serde_ext;

// Re-exports
pub use context::InvocationContext;
pub use error::{BoxError, ErrorKind, RouterError};
pub use event::{
    Category, Envelope, EventMetadata, HttpEvent, IotMessage, QueueMessage, StorageMessage,
    TimerMessage, TriggerEvent, TriggerMessage, event_type,
};
pub use handler::{BoxHandler, DynHandler, Handler, HandlerFuture, SyncHandler, boxed};
pub use logger::{LogLevel, LogRecord, Logger, NoopLogger};
pub use message::Message;
pub use response::{HttpResult, IntoResponse};
pub use router::{Predicate, Route, Router};
