//! Configuration module for the Switchboard runtime.
//!
//! This module provides layered configuration loading and validation for the
//! registry, the dispatch loop, reconciliation and logging.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DispatchConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, ReconcileConfig,
    RegistryConfig, SpanEventConfig, SwitchboardConfig,
};
pub use validation::validate_config;
