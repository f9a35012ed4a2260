//! # Switchboard
//!
//! Command registration, autocompletion and component routing for chat
//! platform interactions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  events  ┌─────────────────────┐     ┌─────────────────┐
//! │  Platform   │─────────▶│ InteractionRuntime  │────▶│ CommandRegistry │──▶ handler
//! │   client    │          │   └── Dispatcher    │────▶│ ComponentRouter │──▶ handler
//! │             │◀─────────│   └── Reconciler    │     └─────────────────┘
//! └─────────────┘ overwrite└─────────────────────┘
//! ```
//!
//! - **Commands**: slash commands and user/message context menus, global or
//!   scoped, with positional autocompletion for slash options
//! - **Components**: buttons, select menus and modals routed by a regex that
//!   must match the whole custom id
//! - **Reconciliation**: bulk overwrite of the platform's command set per scope
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchboard::prelude::*;
//!
//! async fn ping(invocation: Arc<CommandInvocation>) {
//!     info!(command = %invocation.name, "pong");
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = InteractionRuntime::builder().build(platform)?;
//!     runtime.register_command(Command::slash("ping", "Ping the bot", ping).build()?)?;
//!
//!     let (events, rx) = runtime.event_channel();
//!     client.forward_events_to(events);
//!     runtime.run_until_signal(rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use switchboard_core as core;
pub use switchboard_framework as framework;
pub use switchboard_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Runtime - main entry point
    pub use switchboard_runtime::{InteractionRuntime, RuntimeError, RuntimeResult};

    // Registration
    pub use switchboard_framework::{
        AUTOCOMPLETE_CAPACITY, Command, CommandRegistry, Component, ComponentRouter,
        RegistrationError,
    };

    // Dispatch and reconciliation
    pub use switchboard_framework::{DispatchObserver, DispatchOutcome, DispatchRecord, Selector};

    // Events - for writing handlers
    pub use switchboard_core::{
        AutocompleteRequest, CommandArgument, CommandInvocation, ComponentInteraction,
        InteractionEvent,
    };

    // Scopes, option trees and the platform seam
    pub use switchboard_core::{
        CommandDescriptor, CommandKind, CommandOption, ComponentKind, Platform, RegisteredCommand,
        RegistrationMode, Scope, ScopeId,
    };

    // Logging macros
    pub use switchboard_runtime::prelude::*;
}
