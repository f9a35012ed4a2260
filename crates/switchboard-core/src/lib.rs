//! # Switchboard Core
//!
//! Shared vocabulary of the Switchboard interaction router.
//!
//! This crate holds everything both sides of the router agree on:
//!
//! - **Scopes**: [`Scope`], [`ScopeId`], [`ScopeKind`] and the
//!   [`RegistrationMode`] that decides how scoped commands are stored
//! - **Kinds**: the closed sets [`CommandKind`] and [`ComponentKind`]
//! - **Option trees**: [`CommandOption`] and [`descend`]
//! - **Events**: [`InteractionEvent`] and its kind-specific payloads
//! - **Platform seam**: the [`Platform`] trait with its bulk-overwrite RPC
//!
//! ```text
//! ┌─────────────────┐  InteractionEvent   ┌────────────┐     ┌──────────┐
//! │ Platform client │────────────────────▶│ Dispatcher │────▶│ Handler  │
//! │                 │◀────────────────────│ Reconciler │     └──────────┘
//! └─────────────────┘ overwrite_commands  └────────────┘
//! ```

pub mod descriptor;
pub mod error;
pub mod event;
pub mod kind;
pub mod option;
pub mod platform;
pub mod scope;

pub use descriptor::{CommandDescriptor, CommandId, RegisteredCommand};
pub use error::{PlatformError, PlatformResult};
pub use event::{
    AutocompleteRequest, CommandArgument, CommandInvocation, ComponentInteraction,
    InteractionEvent, InvocationData,
};
pub use kind::{CommandKind, ComponentKind};
pub use option::{CommandOption, OptionKind, descend};
pub use platform::{BoxedPlatform, Platform};
pub use scope::{RegistrationMode, Scope, ScopeId, ScopeKind};
