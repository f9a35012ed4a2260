//! Command reconciliation.
//!
//! The [`Reconciler`] keeps the platform's registered command set in line with
//! the application's. Each call is a bulk overwrite: the platform replaces
//! everything it has for the scope with the selected commands, so commands
//! left out of a push disappear from the platform.
//!
//! ```rust,ignore
//! let reconciler = Reconciler::new(registry.clone(), platform.clone());
//!
//! // Push every global command the registry knows about.
//! reconciler.overwrite_registered(Scope::Global, &Selector::All).await?;
//!
//! // Push only two commands to one scope.
//! let only = Selector::names(["ping", "search"]);
//! reconciler.overwrite_registered(Scope::Scoped(ScopeId(42)), &only).await?;
//! ```
//!
//! The ids the platform assigned are kept in memory per scope and never
//! persisted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use switchboard_core::{BoxedPlatform, CommandDescriptor, PlatformResult, RegisteredCommand, Scope};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::registry::CommandRegistry;

/// Chooses which commands a push includes.
#[derive(Clone, Default)]
pub enum Selector {
    #[default]
    All,
    Names(HashSet<String>),
    Predicate(Arc<dyn Fn(&CommandDescriptor) -> bool + Send + Sync>),
}

impl Selector {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&CommandDescriptor) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn accepts(&self, descriptor: &CommandDescriptor) -> bool {
        match self {
            Self::All => true,
            Self::Names(names) => names.contains(&descriptor.name),
            Self::Predicate(f) => f(descriptor),
        }
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Names(names) => f.debug_tuple("Names").field(names).finish(),
            Self::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Pushes command sets to the platform and remembers what it answered.
pub struct Reconciler {
    registry: Arc<CommandRegistry>,
    platform: BoxedPlatform,
    registered: RwLock<HashMap<Scope, Vec<RegisteredCommand>>>,
}

impl Reconciler {
    pub fn new(registry: Arc<CommandRegistry>, platform: BoxedPlatform) -> Self {
        Self {
            registry,
            platform,
            registered: RwLock::new(HashMap::new()),
        }
    }

    pub fn platform(&self) -> &BoxedPlatform {
        &self.platform
    }

    /// Replaces the platform's commands in `scope` with the selected part of
    /// `desired`.
    ///
    /// On success every registered command is logged sorted by kind and name,
    /// and the list is returned in that order.
    pub async fn overwrite(
        &self,
        scope: Scope,
        desired: Vec<CommandDescriptor>,
        selector: &Selector,
    ) -> PlatformResult<Vec<RegisteredCommand>> {
        let mut payload: Vec<_> = desired
            .into_iter()
            .filter(|descriptor| selector.accepts(descriptor))
            .collect();
        payload.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));

        debug!(
            platform = self.platform.name(),
            scope = %scope,
            count = payload.len(),
            "Overwriting platform commands"
        );

        let mut registered = match self.platform.overwrite_commands(scope, payload).await {
            Ok(registered) => registered,
            Err(e) => {
                warn!(platform = self.platform.name(), scope = %scope, error = %e, "Bulk overwrite failed");
                return Err(e);
            }
        };
        registered.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        for command in &registered {
            info!(
                "Registered {} {} command with ID {} and name {}",
                scope, command.kind, command.id, command.name
            );
        }

        self.registered.write().insert(scope, registered.clone());
        Ok(registered)
    }

    /// Pushes the registry's own commands for `scope`.
    pub async fn overwrite_registered(
        &self,
        scope: Scope,
        selector: &Selector,
    ) -> PlatformResult<Vec<RegisteredCommand>> {
        let desired = self
            .registry
            .commands(scope)
            .iter()
            .map(|command| command.descriptor())
            .collect();
        self.overwrite(scope, desired, selector).await
    }

    /// Runs [`overwrite`](Self::overwrite) on its own task.
    pub fn spawn_overwrite(
        self: &Arc<Self>,
        scope: Scope,
        desired: Vec<CommandDescriptor>,
        selector: Selector,
    ) -> JoinHandle<PlatformResult<Vec<RegisteredCommand>>> {
        let reconciler = Arc::clone(self);
        tokio::spawn(async move { reconciler.overwrite(scope, desired, &selector).await })
    }

    /// What the platform answered for `scope` on the last successful push.
    pub fn registered(&self, scope: Scope) -> Vec<RegisteredCommand> {
        self.registered
            .read()
            .get(&scope)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops the ids remembered for `scope`, returning how many there were.
    pub fn forget(&self, scope: Scope) -> usize {
        self.registered
            .write()
            .remove(&scope)
            .map_or(0, |commands| commands.len())
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("platform", &self.platform.name())
            .field("scopes", &self.registered.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use switchboard_core::{CommandId, CommandInvocation, CommandKind, PlatformError, ScopeId};

    use crate::command::Command;

    /// Records every payload and answers with sequential ids.
    #[derive(Default)]
    struct RecordingPlatform {
        payloads: Mutex<Vec<(Scope, Vec<String>)>>,
        offline: AtomicBool,
    }

    #[async_trait]
    impl switchboard_core::Platform for RecordingPlatform {
        fn name(&self) -> &str {
            "recording"
        }

        async fn overwrite_commands(
            &self,
            scope: Scope,
            commands: Vec<CommandDescriptor>,
        ) -> PlatformResult<Vec<RegisteredCommand>> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(PlatformError::NotConnected);
            }
            self.payloads
                .lock()
                .push((scope, commands.iter().map(|c| c.name.clone()).collect()));
            // Answer in reverse to check the result gets sorted.
            Ok(commands
                .into_iter()
                .rev()
                .enumerate()
                .map(|(i, c)| RegisteredCommand {
                    id: CommandId(100 + i as u64),
                    name: c.name,
                    kind: c.kind,
                })
                .collect())
        }
    }

    fn descriptor(name: &str) -> CommandDescriptor {
        CommandDescriptor {
            name: name.into(),
            description: format!("{name} command"),
            kind: CommandKind::Slash,
            options: vec![],
        }
    }

    fn reconciler(platform: Arc<RecordingPlatform>) -> Reconciler {
        Reconciler::new(Arc::new(CommandRegistry::simple()), platform)
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_set() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = reconciler(Arc::clone(&platform));
        let scope = Scope::Scoped(ScopeId(9));

        reconciler
            .overwrite(scope, vec![descriptor("a"), descriptor("b")], &Selector::All)
            .await
            .unwrap();
        reconciler
            .overwrite(scope, vec![descriptor("a")], &Selector::All)
            .await
            .unwrap();

        let payloads = platform.payloads.lock();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1], (scope, vec!["a".to_string()]));
        drop(payloads);

        let registered = reconciler.registered(scope);
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].name, "a");
    }

    #[tokio::test]
    async fn test_result_sorted_by_kind_and_name() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = reconciler(Arc::clone(&platform));
        let mut menu = descriptor("Quote");
        menu.kind = CommandKind::MessageContextMenu;

        let registered = reconciler
            .overwrite(
                Scope::Global,
                vec![menu, descriptor("zeta"), descriptor("alpha")],
                &Selector::All,
            )
            .await
            .unwrap();

        let names: Vec<_> = registered.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta", "Quote"]);
    }

    #[tokio::test]
    async fn test_selectors_filter_payload() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = reconciler(Arc::clone(&platform));
        let desired = || vec![descriptor("a"), descriptor("b"), descriptor("c")];

        reconciler
            .overwrite(Scope::Global, desired(), &Selector::names(["b", "c"]))
            .await
            .unwrap();
        reconciler
            .overwrite(Scope::Global, desired(), &Selector::predicate(|d| d.name != "b"))
            .await
            .unwrap();

        let payloads = platform.payloads.lock();
        assert_eq!(payloads[0].1, ["b", "c"]);
        assert_eq!(payloads[1].1, ["a", "c"]);
    }

    #[tokio::test]
    async fn test_overwrite_registered_uses_registry() {
        async fn noop(_invocation: Arc<CommandInvocation>) {}

        let platform = Arc::new(RecordingPlatform::default());
        let registry = Arc::new(CommandRegistry::simple());
        registry
            .register(Command::slash("ping", "Ping", noop).build().unwrap())
            .unwrap();
        registry
            .register(Command::slash("local", "Local", noop).scoped().build().unwrap())
            .unwrap();
        let reconciler = Reconciler::new(registry, platform.clone());

        reconciler
            .overwrite_registered(Scope::Global, &Selector::All)
            .await
            .unwrap();
        reconciler
            .overwrite_registered(Scope::Scoped(ScopeId(1)), &Selector::All)
            .await
            .unwrap();

        let payloads = platform.payloads.lock();
        assert_eq!(payloads[0].1, ["ping"]);
        assert_eq!(payloads[1].1, ["local"]);
    }

    #[tokio::test]
    async fn test_failed_overwrite_keeps_previous_ids() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = reconciler(Arc::clone(&platform));
        let scope = Scope::Scoped(ScopeId(4));

        let before = reconciler
            .overwrite(scope, vec![descriptor("a"), descriptor("b")], &Selector::All)
            .await
            .unwrap();

        platform.offline.store(true, Ordering::SeqCst);
        let err = reconciler
            .overwrite(scope, vec![descriptor("a")], &Selector::All)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotConnected));

        let kept = reconciler.registered(scope);
        assert_eq!(kept, before);
        let names: Vec<_> = kept.iter().map(|c| (c.name.as_str(), c.id)).collect();
        assert_eq!(names, [("a", CommandId(101)), ("b", CommandId(100))]);
    }

    #[tokio::test]
    async fn test_spawn_overwrite() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = Arc::new(reconciler(Arc::clone(&platform)));

        let registered = reconciler
            .spawn_overwrite(Scope::Global, vec![descriptor("a")], Selector::All)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registered[0].id, CommandId(100));
    }

    #[tokio::test]
    async fn test_forget_scope() {
        let platform = Arc::new(RecordingPlatform::default());
        let reconciler = reconciler(platform);
        let scope = Scope::Scoped(ScopeId(3));

        reconciler
            .overwrite(scope, vec![descriptor("a"), descriptor("b")], &Selector::All)
            .await
            .unwrap();
        assert_eq!(reconciler.forget(scope), 2);
        assert!(reconciler.registered(scope).is_empty());
        assert_eq!(reconciler.forget(scope), 0);
    }
}
