//! Definition of filtrate's error and result.

use std::sync::PoisonError;

use thiserror::Error;

use crate::aggregation::AggregationError;

/// The library's error enum
#[derive(Debug, Clone, Error)]
pub enum FiltrateError {
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// An Error appeared related to the schema.
    #[error("Schema error: '{0}'")]
    SchemaError(String),
    /// A thread holding the locked panicked and poisoned the lock.
    #[error("A thread holding the lock panicked and poisoned the lock")]
    Poisoned,
    /// An Error happened in one of the thread.
    #[error("An error occurred in a thread: '{0}'")]
    ErrorInThread(String),
    /// System error. (e.g.: We failed spawning a new thread).
    #[error("System error.'{0}'")]
    SystemError(String),
    /// An error occurred while building or running an aggregation.
    #[error("An error occurred in an aggregation: '{0}'")]
    AggregationError(#[from] AggregationError),
}

impl<Guard> From<PoisonError<Guard>> for FiltrateError {
    fn from(_: PoisonError<Guard>) -> FiltrateError {
        FiltrateError::Poisoned
    }
}

impl From<serde_json::Error> for FiltrateError {
    fn from(error: serde_json::Error) -> FiltrateError {
        FiltrateError::InvalidArgument(format!("Failed to convert to or from json: {error}"))
    }
}

impl From<rayon::ThreadPoolBuildError> for FiltrateError {
    fn from(error: rayon::ThreadPoolBuildError) -> FiltrateError {
        FiltrateError::SystemError(error.to_string())
    }
}
