//! Error types for alarm construction, validation and rendering.

use thiserror::Error;

/// Errors that can occur while building or rendering an alarm.
///
/// None of these are transient: each one points at input the caller has to
/// correct before trying again.
#[derive(Error, Debug)]
pub enum AlarmError {
    /// An alarm (or its event reference) could not be created.
    #[error("Construction error: {0}")]
    Construction(String),

    /// An accessor rejected its input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The alarm is not complete enough to be rendered.
    #[error("Cannot render VALARM: {0}")]
    SerializationPrecondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for alarm operations.
pub type AlarmResult<T> = Result<T, AlarmError>;
