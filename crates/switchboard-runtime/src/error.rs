//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;
use switchboard_core::PlatformError;
use switchboard_framework::RegistrationError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
