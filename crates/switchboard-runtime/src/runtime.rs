//! The interaction runtime.
//!
//! [`InteractionRuntime`] wires the registry, the component router, the
//! dispatcher and the reconciler together and drives them from a channel of
//! [`InteractionEvent`]s fed by the platform client.
//!
//! ```text
//!  platform client ──▶ mpsc::Sender ──▶ run() ──▶ Dispatcher ──▶ handler
//!                                         │
//!                        ScopeLeft ───────┴──▶ Reconciler::forget
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use switchboard_runtime::InteractionRuntime;
//!
//! let runtime = InteractionRuntime::builder()
//!     .config_file("config/switchboard.toml")
//!     .build(platform)?;
//!
//! runtime.register_command(Command::slash("ping", "Ping", ping).build()?)?;
//!
//! let (events, rx) = runtime.event_channel();
//! client.forward_events_to(events);
//! runtime.run_until_signal(rx).await?;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, SwitchboardConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;
use switchboard_core::{
    BoxedPlatform, InteractionEvent, RegisteredCommand, Scope, ScopeId,
};
use switchboard_framework::{
    Command, CommandRegistry, Component, ComponentRouter, DispatchObserver, DispatchOutcome,
    Dispatcher, Reconciler, Selector,
};

/// Counters collected by one [`InteractionRuntime::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Events received from the channel.
    pub events: u64,
    /// Events that invoked a handler.
    pub handled: u64,
    /// Events dropped without a handler (unregistered, no match, ambiguous...).
    pub unhandled: u64,
}

#[derive(Default)]
struct Counters {
    events: AtomicU64,
    handled: AtomicU64,
    unhandled: AtomicU64,
}

impl Counters {
    fn record(&self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Handled => {
                self.handled.fetch_add(1, Ordering::Relaxed);
            }
            DispatchOutcome::ScopeReleased { .. } => {}
            _ => {
                self.unhandled.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self) -> RuntimeStats {
        RuntimeStats {
            events: self.events.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
        }
    }
}

/// Owns the routing tables and runs the event loop.
pub struct InteractionRuntime {
    config: SwitchboardConfig,
    registry: Arc<CommandRegistry>,
    router: Arc<ComponentRouter>,
    dispatcher: Dispatcher,
    reconciler: Arc<Reconciler>,
    shutdown: CancellationToken,
}

impl InteractionRuntime {
    /// Creates a runtime without touching the global subscriber.
    pub fn new(config: SwitchboardConfig, platform: BoxedPlatform) -> Self {
        let registry = Arc::new(CommandRegistry::new(config.registry.mode));
        let router = Arc::new(ComponentRouter::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::clone(&router));
        let reconciler = Arc::new(Reconciler::new(Arc::clone(&registry), platform));

        Self {
            config,
            registry,
            router,
            dispatcher,
            reconciler,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime and initializes logging from `config`.
    pub fn from_config(config: &SwitchboardConfig, platform: BoxedPlatform) -> Self {
        // try_init won't fail loudly if a subscriber is already set
        logging::init_from_config(&config.logging);

        info!(
            platform = platform.name(),
            mode = %config.registry.mode,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Self::new(config.clone(), platform)
    }

    /// Attaches a dispatch observer.
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.dispatcher = self.dispatcher.with_observer(observer);
        self
    }

    pub fn config(&self) -> &SwitchboardConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<ComponentRouter> {
        &self.router
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn register_command(&self, command: Command) -> RuntimeResult<()> {
        self.registry.register(command)?;
        Ok(())
    }

    pub fn register_command_for_scope(&self, scope: ScopeId, command: Command) -> RuntimeResult<()> {
        self.registry.register_for_scope(scope, command)?;
        Ok(())
    }

    pub fn register_component(&self, component: Component) -> RuntimeResult<()> {
        self.router.register(component)?;
        Ok(())
    }

    /// Pushes the registry's commands for `scope` to the platform.
    pub async fn sync_commands(
        &self,
        scope: Scope,
        selector: &Selector,
    ) -> RuntimeResult<Vec<RegisteredCommand>> {
        Ok(self.reconciler.overwrite_registered(scope, selector).await?)
    }

    // =========================================================================
    // Event Loop
    // =========================================================================

    /// Creates the channel the platform client feeds events into.
    ///
    /// The capacity is `dispatch.event_buffer`; senders wait once it is full.
    pub fn event_channel(&self) -> (mpsc::Sender<InteractionEvent>, mpsc::Receiver<InteractionEvent>) {
        mpsc::channel(self.config.dispatch.event_buffer.max(1))
    }

    /// Dispatches events from `events` until the channel closes or
    /// [`shutdown`](Self::shutdown) is called.
    ///
    /// With `dispatch.spawn_per_event` every event gets its own task; the
    /// loop still waits for all of them before returning.
    pub async fn run(&self, mut events: mpsc::Receiver<InteractionEvent>) -> RuntimeResult<RuntimeStats> {
        if self.config.reconcile.sync_global_on_start {
            self.sync_commands(Scope::Global, &Selector::All).await?;
        }

        let spawn = self.config.dispatch.spawn_per_event;
        let tracker = TaskTracker::new();
        let counters = Arc::new(Counters::default());

        info!(
            commands = self.registry.len(),
            components = self.router.len(),
            spawn_per_event = spawn,
            "Interaction runtime is now running"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, stopping event loop");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Event channel closed");
                        break;
                    };
                    counters.events.fetch_add(1, Ordering::Relaxed);

                    let dispatcher = self.dispatcher.clone();
                    let reconciler = Arc::clone(&self.reconciler);
                    let counters = Arc::clone(&counters);
                    let task = async move {
                        handle_event(&dispatcher, &reconciler, &counters, event).await;
                    };
                    if spawn {
                        tracker.spawn(task);
                    } else {
                        task.await;
                    }
                }
            }
        }

        tracker.close();
        if !tracker.is_empty() {
            debug!(pending = tracker.len(), "Waiting for in-flight events");
        }
        tracker.wait().await;

        let stats = counters.snapshot();
        info!(
            events = stats.events,
            handled = stats.handled,
            unhandled = stats.unhandled,
            "Runtime stopped"
        );
        Ok(stats)
    }

    /// Like [`run`](Self::run), also stopping on Ctrl+C or SIGTERM.
    pub async fn run_until_signal(
        &self,
        events: mpsc::Receiver<InteractionEvent>,
    ) -> RuntimeResult<RuntimeStats> {
        let token = self.shutdown.clone();
        let watcher = tokio::spawn(async move {
            wait_for_shutdown().await;
            token.cancel();
        });

        let result = self.run(events).await;
        watcher.abort();
        result
    }

    /// Stops a running event loop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Returns a token that stops the event loop when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

impl std::fmt::Debug for InteractionRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRuntime")
            .field("mode", &self.registry.mode())
            .field("commands", &self.registry.len())
            .field("components", &self.router.len())
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

async fn handle_event(
    dispatcher: &Dispatcher,
    reconciler: &Reconciler,
    counters: &Counters,
    event: InteractionEvent,
) {
    let released = match &event {
        InteractionEvent::ScopeLeft { scope } => Some(*scope),
        _ => None,
    };

    let outcome = dispatcher.dispatch(event).await;
    counters.record(&outcome);

    if let Some(scope) = released {
        let forgotten = reconciler.forget(Scope::Scoped(scope));
        debug!(scope = %scope, forgotten, "Dropped registered command ids");
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating an [`InteractionRuntime`] with custom configuration.
///
/// ```rust,ignore
/// let runtime = InteractionRuntime::builder()
///     .config_file("config/production.toml")
///     .profile("production")
///     .build(platform)?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: SwitchboardConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads and validates the configuration, then builds the runtime.
    pub fn build(self, platform: BoxedPlatform) -> RuntimeResult<InteractionRuntime> {
        let config = self.config_loader.load()?;
        validate_config(&config)?;
        Ok(InteractionRuntime::from_config(&config, platform))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
