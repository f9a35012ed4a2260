//! Interaction dispatcher.
//!
//! The [`Dispatcher`] receives every [`InteractionEvent`] from the platform
//! client and invokes at most one handler for it:
//!
//! ```text
//!                         ┌──────────────────┐
//!   Command ─────────────▶│ CommandRegistry  │──▶ command handler
//!                         └──────────────────┘
//!                         ┌──────────────────┐   ┌──────────────┐
//!   Autocomplete ────────▶│ CommandRegistry  │──▶│ option index │──▶ slot handler
//!                         └──────────────────┘   └──────────────┘
//!                         ┌──────────────────┐
//!   Component ───────────▶│ ComponentRouter  │──▶ component handler
//!                         └──────────────────┘
//!   ScopeLeft ───────────▶ CommandRegistry::unregister_scope
//! ```
//!
//! Handlers are awaited inline; there is no retry, timeout or queuing.
//! Events that match nothing are logged and dropped, and the platform is not
//! told about it. Every decision is returned as a [`DispatchOutcome`] and
//! reported to an optional [`DispatchObserver`].
//!
//! # Tower Service Integration
//!
//! `Dispatcher` implements `tower::Service<InteractionEvent>`, so middleware
//! can be stacked in front of it:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .concurrency_limit(64)
//!     .service(dispatcher.clone());
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use switchboard_core::{
    AutocompleteRequest, CommandInvocation, CommandKind, ComponentInteraction, InteractionEvent,
    Scope, ScopeId,
};
use tower::Service;
use tracing::{Instrument, Level, debug, info, span, trace, warn};

use crate::autocomplete::{AutocompleteResolution, resolve};
use crate::registry::CommandRegistry;
use crate::router::{ComponentRouter, RouteMatch};

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Exactly one handler was invoked.
    Handled,
    /// No command is registered under that kind, scope and name.
    Unregistered,
    /// No component pattern matched the custom id.
    NoMatch,
    /// Several component patterns matched; nothing was invoked.
    Ambiguous { patterns: Vec<String> },
    /// The focused option sits past the autocompletion capacity.
    AutocompleteOutOfRange { index: usize },
    /// The focused option is not declared where the request path points.
    FocusedOptionNotFound,
    /// A scope was released and `removed` commands were dropped with it.
    ScopeReleased { removed: usize },
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// A single dispatch decision, as seen by a [`DispatchObserver`].
#[derive(Debug)]
pub struct DispatchRecord<'a> {
    /// Short event name, see [`InteractionEvent::event_name`].
    pub event: &'static str,
    /// Command name, custom id or scope id the event targeted.
    pub target: String,
    pub outcome: &'a DispatchOutcome,
    /// Time spent deciding and running the handler.
    pub elapsed: Duration,
}

/// Hook called after every dispatch decision.
pub trait DispatchObserver: Send + Sync {
    fn on_dispatch(&self, record: &DispatchRecord<'_>);
}

/// Routes interaction events to their handlers.
///
/// Cloning is cheap: the registry, the router and the observer are shared.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    router: Arc<ComponentRouter>,
    observer: Option<Arc<dyn DispatchObserver>>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, router: Arc<ComponentRouter>) -> Self {
        Self {
            registry,
            router,
            observer: None,
        }
    }

    /// Attaches an observer called after every decision.
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<ComponentRouter> {
        &self.router
    }

    /// Dispatches one event and reports what happened.
    pub async fn dispatch(&self, event: InteractionEvent) -> DispatchOutcome {
        let event_name = event.event_name();
        let target = target_of(&event);
        let span = span!(Level::DEBUG, "dispatch", event = event_name, target = %target);
        let started = Instant::now();

        let outcome = async move {
            match event {
                InteractionEvent::Command(invocation) => self.dispatch_command(invocation).await,
                InteractionEvent::Autocomplete(request) => {
                    self.dispatch_autocomplete(request).await
                }
                InteractionEvent::Component(interaction) => {
                    self.dispatch_component(interaction).await
                }
                InteractionEvent::ScopeLeft { scope } => self.release_scope(scope),
            }
        }
        .instrument(span)
        .await;

        if let Some(observer) = &self.observer {
            observer.on_dispatch(&DispatchRecord {
                event: event_name,
                target,
                outcome: &outcome,
                elapsed: started.elapsed(),
            });
        }

        outcome
    }

    async fn dispatch_command(&self, invocation: CommandInvocation) -> DispatchOutcome {
        let kind = invocation.kind();
        if kind == CommandKind::Slash {
            trace!(
                "Received slash command: {} ({})",
                invocation.full_name(),
                invocation.log_arguments()
            );
        }

        let Some(command) = self
            .registry
            .lookup(kind, invocation.scope, &invocation.name)
        else {
            info!(
                kind = %kind,
                name = %invocation.name,
                scope = %Scope::from_option(invocation.scope),
                "Received unregistered command"
            );
            return DispatchOutcome::Unregistered;
        };

        command.handler().call(Arc::new(invocation)).await;
        DispatchOutcome::Handled
    }

    async fn dispatch_autocomplete(&self, request: AutocompleteRequest) -> DispatchOutcome {
        let command = self
            .registry
            .lookup(CommandKind::Slash, request.scope, &request.name);
        let Some((command, table)) = command
            .as_ref()
            .and_then(|command| command.autocomplete().map(|table| (command, table)))
        else {
            info!(
                name = %request.name,
                scope = %Scope::from_option(request.scope),
                "Received autocompletion for unregistered command"
            );
            return DispatchOutcome::Unregistered;
        };

        match resolve(command.options(), table, &request) {
            AutocompleteResolution::Overridden { index, handler }
            | AutocompleteResolution::Fallback { index, handler } => {
                debug!(command = %request.full_path, index, "Resolved autocompletion position");
                handler.call(Arc::new(request)).await;
                DispatchOutcome::Handled
            }
            AutocompleteResolution::OutOfRange { index } => {
                warn!(
                    command = %request.full_path,
                    focused = %request.focused_option,
                    index,
                    "Autocompletion index out of range"
                );
                DispatchOutcome::AutocompleteOutOfRange { index }
            }
            AutocompleteResolution::FocusedNotFound => {
                info!(
                    command = %request.full_path,
                    focused = %request.focused_option,
                    "Focused option is not declared for this command path"
                );
                DispatchOutcome::FocusedOptionNotFound
            }
        }
    }

    async fn dispatch_component(&self, interaction: ComponentInteraction) -> DispatchOutcome {
        let kind = interaction.kind();
        match self.router.route(kind, interaction.custom_id()) {
            RouteMatch::Unique(component) => {
                component.handler().call(Arc::new(interaction)).await;
                DispatchOutcome::Handled
            }
            RouteMatch::NoMatch => {
                info!(
                    kind = %kind,
                    custom_id = interaction.custom_id(),
                    "No component handler matches this custom id"
                );
                DispatchOutcome::NoMatch
            }
            RouteMatch::Ambiguous(components) => {
                let listing = components
                    .iter()
                    .map(|c| format!("{} -> {}", c.pattern(), c.handler_name()))
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    kind = %kind,
                    custom_id = interaction.custom_id(),
                    "Several component handlers match this custom id: {listing}"
                );
                DispatchOutcome::Ambiguous {
                    patterns: components.iter().map(|c| c.pattern().to_string()).collect(),
                }
            }
        }
    }

    fn release_scope(&self, scope: ScopeId) -> DispatchOutcome {
        let removed = self.registry.unregister_scope(scope);
        DispatchOutcome::ScopeReleased { removed }
    }
}

fn target_of(event: &InteractionEvent) -> String {
    match event {
        InteractionEvent::Command(invocation) => invocation.full_name().to_string(),
        InteractionEvent::Autocomplete(request) => request.full_path.clone(),
        InteractionEvent::Component(interaction) => interaction.custom_id().to_string(),
        InteractionEvent::ScopeLeft { scope } => scope.to_string(),
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("router", &self.router)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// ============================================================================
// Tower Service Implementation for Dispatcher
// ============================================================================

impl Service<InteractionEvent> for Dispatcher {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: InteractionEvent) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(event).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use switchboard_core::{CommandArgument, CommandOption};
    use tower::ServiceExt;

    use crate::command::Command;
    use crate::component::Component;

    fn counting<E: Send + Sync + 'static>(
        counter: &Arc<AtomicUsize>,
    ) -> impl Fn(Arc<E>) -> futures::future::Ready<()> + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |_event: Arc<E>| {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Arc::new(CommandRegistry::complex()),
            Arc::new(ComponentRouter::new()),
        )
    }

    #[tokio::test]
    async fn test_global_command_is_handled() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(Command::slash("ping", "Ping", counting::<CommandInvocation>(&counter)).build().unwrap())
            .unwrap();

        let event = CommandInvocation::slash("ping", None, vec![CommandArgument::new("loud", true)]);
        assert_eq!(dispatcher.dispatch(event.into()).await, DispatchOutcome::Handled);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scoped_lookup_does_not_see_global() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(Command::slash("ping", "Ping", counting::<CommandInvocation>(&counter)).build().unwrap())
            .unwrap();

        let event = CommandInvocation::slash("ping", Some(ScopeId(1)), vec![]);
        assert_eq!(dispatcher.dispatch(event.into()).await, DispatchOutcome::Unregistered);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_context_menu_command() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register_for_scope(
                ScopeId(5),
                Command::message_context_menu("Quote", counting::<CommandInvocation>(&counter))
                    .scoped()
                    .build(),
            )
            .unwrap();

        let event = CommandInvocation::message_context_menu("Quote", Some(ScopeId(5)), 77);
        assert!(dispatcher.dispatch(event.into()).await.is_handled());

        // Same name, other kind.
        let event = CommandInvocation::user_context_menu("Quote", Some(ScopeId(5)), 1);
        assert_eq!(dispatcher.dispatch(event.into()).await, DispatchOutcome::Unregistered);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_component_unique_and_ambiguous() {
        let unique = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .router()
            .register(Component::button(r"buy_\d+", counting::<ComponentInteraction>(&unique)))
            .unwrap();

        let outcome = dispatcher.dispatch(ComponentInteraction::button("buy_3").into()).await;
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(unique.load(Ordering::SeqCst), 1);

        let other = Arc::new(AtomicUsize::new(0));
        dispatcher
            .router()
            .register(Component::button("buy_.*", counting::<ComponentInteraction>(&other)))
            .unwrap();

        let outcome = dispatcher.dispatch(ComponentInteraction::button("buy_3").into()).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Ambiguous {
                patterns: vec![r"buy_\d+".to_string(), "buy_.*".to_string()]
            }
        );
        assert_eq!(unique.load(Ordering::SeqCst), 1);
        assert_eq!(other.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_component_no_match() {
        let dispatcher = dispatcher();
        let outcome = dispatcher
            .dispatch(ComponentInteraction::modal("feedback", vec![]).into())
            .await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_autocomplete_routes_by_position() {
        let category = Arc::new(AtomicUsize::new(0));
        let query = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(
                Command::slash("search", "Search", counting::<CommandInvocation>(&Arc::new(AtomicUsize::new(0))))
                    .option(CommandOption::string("category", "Category").autocomplete(true))
                    .option(CommandOption::string("query", "Query").autocomplete(true))
                    .autocomplete(0, counting::<AutocompleteRequest>(&category))
                    .autocomplete(1, counting::<AutocompleteRequest>(&query))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let req = AutocompleteRequest::new("search", None, "query", "rus");
        assert!(dispatcher.dispatch(req.into()).await.is_handled());
        assert_eq!(query.load(Ordering::SeqCst), 1);
        assert_eq!(category.load(Ordering::SeqCst), 0);

        let req = AutocompleteRequest::new("search", None, "missing", "");
        assert_eq!(
            dispatcher.dispatch(req.into()).await,
            DispatchOutcome::FocusedOptionNotFound
        );
        assert_eq!(category.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_autocomplete_out_of_range() {
        let dispatcher = dispatcher();
        let options = (0..30).map(|i| CommandOption::string(format!("opt{i}"), "Option"));
        dispatcher
            .registry()
            .register(
                Command::slash("wide", "Wide", counting::<CommandInvocation>(&Arc::new(AtomicUsize::new(0))))
                    .options(options)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let req = AutocompleteRequest::new("wide", None, "opt27", "");
        assert_eq!(
            dispatcher.dispatch(req.into()).await,
            DispatchOutcome::AutocompleteOutOfRange { index: 27 }
        );

        // Positions below the capacity fall back to the default handler.
        let req = AutocompleteRequest::new("wide", None, "opt3", "");
        assert!(dispatcher.dispatch(req.into()).await.is_handled());
    }

    #[tokio::test]
    async fn test_autocomplete_for_context_menu_is_unregistered() {
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(Command::user_context_menu("Report", counting::<CommandInvocation>(&Arc::new(AtomicUsize::new(0)))).build())
            .unwrap();

        let req = AutocompleteRequest::new("Report", None, "reason", "");
        assert_eq!(dispatcher.dispatch(req.into()).await, DispatchOutcome::Unregistered);
    }

    #[tokio::test]
    async fn test_scope_left_releases_scope() {
        let dispatcher = dispatcher();
        for name in ["a", "b"] {
            dispatcher
                .registry()
                .register_for_scope(
                    ScopeId(1),
                    Command::slash(name, "Scoped", counting::<CommandInvocation>(&Arc::new(AtomicUsize::new(0))))
                        .scoped()
                        .build()
                        .unwrap(),
                )
                .unwrap();
        }

        let outcome = dispatcher
            .dispatch(InteractionEvent::ScopeLeft { scope: ScopeId(1) })
            .await;
        assert_eq!(outcome, DispatchOutcome::ScopeReleased { removed: 2 });
        assert!(dispatcher.registry().is_empty());
    }

    #[derive(Default)]
    struct RecordingObserver {
        records: Mutex<Vec<(&'static str, String, DispatchOutcome)>>,
    }

    impl DispatchObserver for RecordingObserver {
        fn on_dispatch(&self, record: &DispatchRecord<'_>) {
            self.records
                .lock()
                .push((record.event, record.target.clone(), record.outcome.clone()));
        }
    }

    #[tokio::test]
    async fn test_observer_sees_every_decision() {
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = dispatcher().with_observer(observer.clone());

        dispatcher
            .dispatch(CommandInvocation::slash("nope sub", None, vec![]).into())
            .await;
        dispatcher
            .dispatch(ComponentInteraction::button("x").into())
            .await;

        let records = observer.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ("command", "nope sub".to_string(), DispatchOutcome::Unregistered));
        assert_eq!(records[1], ("component", "x".to_string(), DispatchOutcome::NoMatch));
    }

    #[tokio::test]
    async fn test_tower_service() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher();
        dispatcher
            .router()
            .register(Component::select_menu("color", counting::<ComponentInteraction>(&counter)))
            .unwrap();

        let mut service = dispatcher.clone();
        let mut task = tokio_test::task::spawn(());
        tokio_test::assert_ready_ok!(task.enter(|cx, _| service.poll_ready(cx)));

        let outcome = dispatcher
            .oneshot(ComponentInteraction::select_menu("color", vec!["red".into()]).into())
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
