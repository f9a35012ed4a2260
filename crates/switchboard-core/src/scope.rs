//! Scopes and registration modes.
//!
//! A [`Scope`] is the isolation boundary for commands. Global commands are
//! visible everywhere; scoped commands belong to one context on the platform
//! (for example a single chat server) identified by a [`ScopeId`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a platform context (a server, a guild, a workspace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub u64);

impl From<u64> for ScopeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a command is registered on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Visible in every context.
    Global,
    /// Visible only inside the identified context.
    Scoped(ScopeId),
}

impl Scope {
    /// Builds a scope from an optional context id, as carried by events.
    pub fn from_option(id: Option<ScopeId>) -> Self {
        match id {
            Some(id) => Self::Scoped(id),
            None => Self::Global,
        }
    }

    /// Returns the scope kind.
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Global => ScopeKind::Global,
            Self::Scoped(_) => ScopeKind::Scoped,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Scoped(id) => write!(f, "scope {id}"),
        }
    }
}

/// Whether a command is declared global or scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Global,
    Scoped,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Scoped => "scoped",
        }
    }
}

/// How the registry stores scoped commands.
///
/// - `Simple` keeps one flat map for every non-global command. The scope id of
///   an event only decides between the global and the non-global map, so there
///   is no per-scope isolation and no per-scope cleanup.
/// - `Complex` keeps one map per scope id, which isolates scopes from each other
///   and lets a whole scope be dropped at once when it goes away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMode {
    #[default]
    Simple,
    Complex,
}

impl RegistrationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
