//! Command registry.
//!
//! The registry owns every registered [`Command`]. Global commands always live
//! in one table keyed by kind and name. Where scoped commands live depends on
//! the [`RegistrationMode`]:
//!
//! ```text
//! Simple                               Complex
//! ┌────────┐  kind ─▶ name ─▶ cmd      ┌────────┐  kind ─▶ name ─▶ cmd
//! │ global │                           │ global │
//! ├────────┤                           ├────────┤
//! │ scoped │  kind ─▶ name ─▶ cmd      │ scoped │  scope id ─▶ kind ─▶ name ─▶ cmd
//! └────────┘                           └────────┘
//! ```
//!
//! In Simple mode the scope id of an event only picks the scoped table over
//! the global one. In Complex mode every scope has its own table, and
//! [`CommandRegistry::unregister_scope`] drops one in a single write.
//!
//! Reads and writes go through `parking_lot` read-write locks. Lookups hand out
//! `Arc` clones, so no lock is held while a handler runs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use switchboard_core::{CommandKind, RegistrationMode, Scope, ScopeId};
use tracing::{debug, trace};

use crate::command::Command;
use crate::error::{RegistrationError, RegistrationResult};

type CommandTable = HashMap<CommandKind, HashMap<String, Arc<Command>>>;

enum ScopedCommands {
    Simple(RwLock<CommandTable>),
    Complex(RwLock<HashMap<ScopeId, CommandTable>>),
}

/// Registry of application commands.
pub struct CommandRegistry {
    mode: RegistrationMode,
    global: RwLock<CommandTable>,
    scoped: ScopedCommands,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(RegistrationMode::default())
    }
}

impl CommandRegistry {
    /// Creates an empty registry in the given mode.
    pub fn new(mode: RegistrationMode) -> Self {
        let scoped = match mode {
            RegistrationMode::Simple => ScopedCommands::Simple(RwLock::new(HashMap::new())),
            RegistrationMode::Complex => ScopedCommands::Complex(RwLock::new(HashMap::new())),
        };
        Self {
            mode,
            global: RwLock::new(HashMap::new()),
            scoped,
        }
    }

    pub fn simple() -> Self {
        Self::new(RegistrationMode::Simple)
    }

    pub fn complex() -> Self {
        Self::new(RegistrationMode::Complex)
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Registers a command.
    ///
    /// Global commands go to the global table. Scoped commands go to the flat
    /// scoped table in Simple mode; Complex mode needs a scope id, see
    /// [`register_for_scope`](Self::register_for_scope).
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicateCommandName`] if the name is taken
    /// - [`RegistrationError::UnsupportedInteraction`] for a scoped command in
    ///   Complex mode
    pub fn register(&self, command: Command) -> RegistrationResult<()> {
        if command.is_global() {
            return insert(&mut self.global.write(), command, None);
        }

        match &self.scoped {
            ScopedCommands::Simple(table) => insert(&mut table.write(), command, None),
            ScopedCommands::Complex(_) => Err(RegistrationError::unsupported(
                command.name(),
                "scoped commands need a scope id in complex mode",
            )),
        }
    }

    /// Registers a scoped command for one scope.
    ///
    /// Simple mode has no per-scope tables, so the id is ignored there.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicateCommandName`] if the name is taken in
    ///   that scope
    /// - [`RegistrationError::UnsupportedInteraction`] for a global command
    pub fn register_for_scope(&self, scope: ScopeId, command: Command) -> RegistrationResult<()> {
        if command.is_global() {
            return Err(RegistrationError::unsupported(
                command.name(),
                "global commands cannot be registered for a scope",
            ));
        }

        match &self.scoped {
            ScopedCommands::Simple(table) => insert(&mut table.write(), command, None),
            ScopedCommands::Complex(scopes) => {
                let mut scopes = scopes.write();
                insert(scopes.entry(scope).or_default(), command, Some(scope))
            }
        }
    }

    /// Registers a batch of commands through [`register`](Self::register),
    /// stopping at the first failure.
    pub fn register_all(&self, commands: impl IntoIterator<Item = Command>) -> RegistrationResult<()> {
        commands
            .into_iter()
            .try_for_each(|command| self.register(command))
    }

    /// Drops every command of a scope at once and returns how many were removed.
    ///
    /// Does nothing in Simple mode or for an unknown scope.
    pub fn unregister_scope(&self, scope: ScopeId) -> usize {
        match &self.scoped {
            ScopedCommands::Simple(_) => {
                debug!(scope = %scope, "Simple registration mode keeps scoped commands");
                0
            }
            ScopedCommands::Complex(scopes) => {
                let removed = scopes.write().remove(&scope).map_or(0, |table| count(&table));
                debug!(scope = %scope, removed, "Unregistered scope");
                removed
            }
        }
    }

    /// Looks up a command by kind, event scope and name.
    pub fn lookup(&self, kind: CommandKind, scope: Option<ScopeId>, name: &str) -> Option<Arc<Command>> {
        trace!(kind = %kind, scope = %Scope::from_option(scope), name, "Looking up command");
        let Some(scope) = scope else {
            return find(&self.global.read(), kind, name);
        };

        match &self.scoped {
            ScopedCommands::Simple(table) => find(&table.read(), kind, name),
            ScopedCommands::Complex(scopes) => scopes
                .read()
                .get(&scope)
                .and_then(|table| find(table, kind, name)),
        }
    }

    /// Lists the commands registered for a scope, sorted by kind and name.
    ///
    /// In Simple mode every scope sees the same flat scoped set.
    pub fn commands(&self, scope: Scope) -> Vec<Arc<Command>> {
        let mut commands = match (scope, &self.scoped) {
            (Scope::Global, _) => collect(&self.global.read()),
            (Scope::Scoped(_), ScopedCommands::Simple(table)) => collect(&table.read()),
            (Scope::Scoped(id), ScopedCommands::Complex(scopes)) => {
                scopes.read().get(&id).map(collect).unwrap_or_default()
            }
        };
        commands.sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
        commands
    }

    /// Total number of registered commands across all scopes.
    pub fn len(&self) -> usize {
        let scoped = match &self.scoped {
            ScopedCommands::Simple(table) => count(&table.read()),
            ScopedCommands::Complex(scopes) => scopes.read().values().map(count).sum(),
        };
        count(&self.global.read()) + scoped
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of scopes that hold commands. Always 0 in Simple mode.
    pub fn scope_count(&self) -> usize {
        match &self.scoped {
            ScopedCommands::Simple(_) => 0,
            ScopedCommands::Complex(scopes) => scopes.read().len(),
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("mode", &self.mode)
            .field("len", &self.len())
            .field("scope_count", &self.scope_count())
            .finish()
    }
}

fn insert(table: &mut CommandTable, command: Command, scope_id: Option<ScopeId>) -> RegistrationResult<()> {
    let names = table.entry(command.kind()).or_default();
    if names.contains_key(command.name()) {
        return Err(RegistrationError::DuplicateCommandName {
            kind: command.kind(),
            name: command.name().to_string(),
            scope: command.scope_kind(),
            scope_id,
        });
    }

    debug!(
        kind = %command.kind(),
        scope = command.scope_kind().as_str(),
        scope_id = ?scope_id,
        name = command.name(),
        "Registered command"
    );
    names.insert(command.name().to_string(), Arc::new(command));
    Ok(())
}

fn find(table: &CommandTable, kind: CommandKind, name: &str) -> Option<Arc<Command>> {
    table.get(&kind).and_then(|names| names.get(name)).cloned()
}

fn collect(table: &CommandTable) -> Vec<Arc<Command>> {
    table.values().flat_map(|names| names.values().cloned()).collect()
}

fn count(table: &CommandTable) -> usize {
    table.values().map(HashMap::len).sum()
}
