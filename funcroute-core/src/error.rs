//! Error types for funcroute.
//!
//! Every failure a dispatch can produce is a [`RouterError`]. The variants form
//! a closed taxonomy; [`RouterError::kind`] exposes the discriminator that
//! error policies key on.

use crate::event::Category;
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all dispatch operations.
#[derive(Error, Debug)]
pub enum RouterError {
    /// No route's predicates held for an envelope or sub-message.
    #[error("no matched route for {category} event")]
    NoMatchedRoute {
        /// The category whose route table was exhausted.
        category: Category,
    },

    /// The envelope shape is neither an HTTP call nor a trigger batch.
    #[error("unknown event type")]
    UnknownEventType,

    /// A trigger sub-message carried an unrecognized `event_type` tag.
    #[error("unknown message type: {event_type}")]
    UnknownMessageType {
        /// The tag that could not be classified.
        event_type: String,
    },

    /// A route declared a query-parameter predicate type outside
    /// `exact`, `substring` and `regexp`.
    #[error("unsupported param predicate type: {0}")]
    UnsupportedParamPredicateType(String),

    /// The envelope was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// More than one trigger sub-message failed; constituents are kept in
    /// message order.
    #[error("{} trigger messages failed", .0.len())]
    TriggerCombined(Vec<RouterError>),

    /// A route or error handler returned an error.
    #[error(transparent)]
    Handler(BoxError),
}

impl RouterError {
    /// Shorthand for [`RouterError::NoMatchedRoute`].
    pub fn no_matched_route(category: Category) -> Self {
        RouterError::NoMatchedRoute { category }
    }

    /// Shorthand for [`RouterError::InvalidRequest`].
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        RouterError::InvalidRequest(reason.into())
    }

    /// The kind discriminator of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::NoMatchedRoute { .. } => ErrorKind::NoMatchedRoute,
            RouterError::UnknownEventType => ErrorKind::UnknownEventType,
            RouterError::UnknownMessageType { .. } => ErrorKind::UnknownMessageType,
            RouterError::UnsupportedParamPredicateType(_) => {
                ErrorKind::UnsupportedParamPredicateType
            }
            RouterError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            RouterError::TriggerCombined(_) => ErrorKind::TriggerCombined,
            RouterError::Handler(_) => ErrorKind::Handler,
        }
    }

    /// The constituent errors of a combined trigger failure.
    ///
    /// Returns an empty slice for every other kind.
    pub fn errors(&self) -> &[RouterError] {
        match self {
            RouterError::TriggerCombined(errors) => errors,
            _ => &[],
        }
    }

    /// Collapses per-message failures: none is success, one is returned
    /// unchanged, several are wrapped into [`RouterError::TriggerCombined`].
    pub fn aggregate(mut errors: Vec<RouterError>) -> Result<(), RouterError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(RouterError::TriggerCombined(errors)),
        }
    }
}

impl From<BoxError> for RouterError {
    fn from(err: BoxError) -> Self {
        RouterError::Handler(err)
    }
}

/// Discriminator for [`RouterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RouterError::NoMatchedRoute`].
    NoMatchedRoute,
    /// See [`RouterError::UnknownEventType`].
    UnknownEventType,
    /// See [`RouterError::UnknownMessageType`].
    UnknownMessageType,
    /// See [`RouterError::UnsupportedParamPredicateType`].
    UnsupportedParamPredicateType,
    /// See [`RouterError::InvalidRequest`].
    InvalidRequest,
    /// See [`RouterError::TriggerCombined`].
    TriggerCombined,
    /// See [`RouterError::Handler`].
    Handler,
}

impl ErrorKind {
    /// Stable name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoMatchedRoute => "NoMatchedRoute",
            ErrorKind::UnknownEventType => "UnknownEventType",
            ErrorKind::UnknownMessageType => "UnknownMessageType",
            ErrorKind::UnsupportedParamPredicateType => "UnsupportedParamPredicateType",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::TriggerCombined => "TriggerCombinedError",
            ErrorKind::Handler => "HandlerError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_none_is_ok() {
        assert!(RouterError::aggregate(Vec::new()).is_ok());
    }

    #[test]
    fn test_aggregate_single_is_unchanged() {
        let err = RouterError::aggregate(vec![RouterError::UnknownMessageType {
            event_type: "x".to_string(),
        }])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownMessageType);
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_aggregate_many_is_combined_in_order() {
        let err = RouterError::aggregate(vec![
            RouterError::no_matched_route(Category::MessageQueue),
            RouterError::no_matched_route(Category::ObjectStorage),
        ])
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TriggerCombined);
        assert_eq!(err.errors().len(), 2);
        assert!(matches!(
            err.errors()[0],
            RouterError::NoMatchedRoute {
                category: Category::MessageQueue
            }
        ));
        assert!(matches!(
            err.errors()[1],
            RouterError::NoMatchedRoute {
                category: Category::ObjectStorage
            }
        ));
        assert_eq!(err.to_string(), "2 trigger messages failed");
    }

    #[test]
    fn test_handler_error_keeps_message() {
        let err = RouterError::from(BoxError::from("quota exceeded"));
        assert_eq!(err.kind(), ErrorKind::Handler);
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
