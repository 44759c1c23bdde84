//! # funcroute-std
//!
//! Standard implementations for the funcroute event dispatcher.
//!
//! This crate provides:
//! - **Pattern matching**: [`matcher::matches`], the structural subset test
//!   behind JSON body filters
//! - **Predicates**: [`predicate`], the pure filter evaluators route kinds
//!   are built from
//! - **Route tables**: [`RouteTable`] and the five route kinds
//! - **CORS**: [`CorsConfig`] and the resolved [`Cors`] policy
//! - **Logging**: `TracingLogger` (feature `tracing`) and [`default_logger`]
//! - **Testing**: [`testing`] doubles for loggers and handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use funcroute_core;

// Modules
pub mod cors;
pub mod logging;
pub mod matcher;
pub mod predicate;
pub mod routes;
pub mod testing;

pub use cors::{Cors, CorsConfig, EffectiveCors};
#[cfg(feature = "tracing")]
pub use logging::TracingLogger;
pub use logging::{default_logger, noop_logger};
pub use predicate::http::ParamPredicate;
pub use routes::{
    BodyFilter, HttpRoute, IotRoute, QueueRoute, RouteTable, StorageEventType, StorageRoute,
    TimerRoute,
};
