//! Switchboard Runtime - Orchestration layer for the Switchboard interaction router.
//!
//! This crate provides:
//! - [`InteractionRuntime`], which owns the registry, the router, the
//!   dispatcher and the reconciler and runs the event loop
//! - Layered configuration through figment (`switchboard.toml`, profiles,
//!   `SWITCHBOARD_*` environment variables)
//! - Logging configuration
//!
//! ```rust,ignore
//! use switchboard_runtime::InteractionRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = InteractionRuntime::builder().build(platform)?;
//!     runtime.register_command(Command::slash("ping", "Ping", ping).build()?)?;
//!
//!     let (events, rx) = runtime.event_channel();
//!     client.forward_events_to(events);
//!
//!     // Run until Ctrl+C
//!     runtime.run_until_signal(rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, Profile, SwitchboardConfig, load_config,
    load_config_from_file,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, LoggingError, SpanEvents};
pub use runtime::{InteractionRuntime, RuntimeBuilder, RuntimeStats};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
