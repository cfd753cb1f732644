//! Input error types

use thiserror::Error;

/// Errors raised while building or loading bindings
///
/// Live input never errors; these only come from configuration.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to load binding set: {0}")]
    Config(#[from] config::ConfigError),

    #[error("deadzone {value} for '{action}' must be within 0..1")]
    InvalidDeadzone { action: String, value: f32 },

    #[error("stick radius {value} for '{action}' must be within 0..1")]
    InvalidRadius { action: String, value: f32 },

    #[error("virtual input '{0}' is already registered")]
    DuplicateName(String),

    #[error("no virtual input named '{0}'")]
    UnknownName(String),
}

/// Result type for input configuration operations
pub type InputResult<T> = Result<T, InputError>;
