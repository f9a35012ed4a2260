//! # Switchboard Framework
//!
//! Registration and dispatch engine of the Switchboard interaction router.
//!
//! This layer provides:
//! - [`CommandRegistry`] for slash and context menu commands, in Simple or
//!   Complex [`RegistrationMode`](switchboard_core::RegistrationMode)
//! - [`ComponentRouter`] matching component custom ids against regex patterns
//! - Positional autocompletion through [`AutocompleteTable`]
//! - [`Dispatcher`], which invokes at most one handler per event
//! - [`Reconciler`], which bulk-overwrites the platform's command set
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchboard_framework::{Command, CommandRegistry, ComponentRouter, Dispatcher};
//!
//! let registry = Arc::new(CommandRegistry::simple());
//! registry.register(Command::slash("ping", "Ping the bot", ping).build()?)?;
//!
//! let router = Arc::new(ComponentRouter::new());
//! let dispatcher = Dispatcher::new(registry, router);
//! let outcome = dispatcher.dispatch(event).await;
//! ```

pub mod autocomplete;
pub mod command;
pub mod component;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod reconcile;
pub mod registry;
pub mod router;

pub use autocomplete::{
    AUTOCOMPLETE_CAPACITY, AutocompleteResolution, AutocompleteTable, focused_position,
};
pub use command::{Command, CommandAction, ContextMenuBuilder, SlashCommandBuilder};
pub use component::Component;
pub use dispatcher::{DispatchObserver, DispatchOutcome, DispatchRecord, Dispatcher};
pub use error::{RegistrationError, RegistrationResult};
pub use handler::{BoxFuture, BoxedHandler, Handler, handler_name, into_handler};
pub use reconcile::{Reconciler, Selector};
pub use registry::CommandRegistry;
pub use router::{ComponentRouter, RouteMatch};
