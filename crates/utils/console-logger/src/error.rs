use thiserror::Error;

/// Raised by `error` (and escalated `warn`) calls when `throw_on_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
#[non_exhaustive]
pub struct LoggedError {
    /// The logged value, stringified.
    pub message: String,
}

impl LoggedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggingError {
    #[error("Failed to build layer: {message}, context: {context}")]
    BuildLayerError {
        message: String,
        context: &'static str,
    },
    #[error("Invalid env filter directive '{directive}': {message}")]
    InvalidDirective { directive: String, message: String },
    #[error("Invalid timezone offset: {0}")]
    InvalidTimezone(String),
}

pub type LoggedResult<T> = Result<T, LoggedError>;
