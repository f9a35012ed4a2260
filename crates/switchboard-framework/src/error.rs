//! Error types for registration.
//!
//! Only registration can fail. Dispatch never returns an error: unmatched,
//! ambiguous or out-of-range events are reported as a
//! [`DispatchOutcome`](crate::dispatcher::DispatchOutcome) and logged.

use switchboard_core::{CommandKind, ScopeId, ScopeKind};
use thiserror::Error;

/// Errors that can occur while registering commands and components.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// A command with the same kind and name already exists in that scope.
    #[error("{kind} command '{name}' is already registered ({})", scope_label(.scope, .scope_id))]
    DuplicateCommandName {
        kind: CommandKind,
        name: String,
        scope: ScopeKind,
        scope_id: Option<ScopeId>,
    },

    /// The interaction cannot be registered through this path.
    #[error("unsupported interaction '{name}': {reason}")]
    UnsupportedInteraction { name: String, reason: String },

    /// A component pattern failed to compile.
    #[error("invalid component pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An autocompletion handler was bound past the platform's option limit.
    #[error("autocompletion position {position} is out of range (capacity {capacity})")]
    AutocompletePositionOutOfRange { position: usize, capacity: usize },
}

impl RegistrationError {
    pub fn unsupported(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedInteraction {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

fn scope_label(scope: &ScopeKind, scope_id: &Option<ScopeId>) -> String {
    match scope_id {
        Some(id) => format!("{} {id}", scope.as_str()),
        None => scope.as_str().to_string(),
    }
}

/// Result type for registration operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;
