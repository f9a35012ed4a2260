//! Shop Bot Example
//!
//! Drives the Switchboard runtime with a scripted sequence of interactions
//! against an in-process platform, so the whole flow can be watched in the
//! logs without a network connection.
//!
//! # Registered Interactions
//!
//! ```text
//! /shop search <query*>           slash, option 0 autocompleted
//! /shop buy <item*> <quantity>    slash, option 0 autocompleted (same slot)
//! "Report message"                message context menu
//! buy_\d+                         button
//! sort_(price|name)               select menu
//! feedback_\d+                    modal
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package shop-bot -- --complex --scope 42
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use serde_json::json;
use switchboard::core::{CommandId, PlatformResult};
use switchboard::prelude::*;
use switchboard::runtime::config::{ConfigLoader, validate_config};
use tracing::{info, warn};

const CATALOGUE: &[&str] = &["apple", "apricot", "banana", "blueberry", "cherry"];

#[derive(Debug, Parser)]
#[command(about = "Scripted shop bot for the Switchboard runtime")]
struct Args {
    /// Configuration file to load instead of ./switchboard.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store scoped commands per scope.
    #[arg(long)]
    complex: bool,

    /// Scope the shop command is registered in.
    #[arg(long, default_value_t = 42)]
    scope: u64,

    /// Dispatch every event on its own task.
    #[arg(long)]
    spawn: bool,
}

// ============================================================================
// Loopback Platform
// ============================================================================

/// Accepts every overwrite and hands out increasing ids.
#[derive(Default)]
struct LoopbackPlatform {
    next_id: AtomicU64,
}

#[async_trait]
impl Platform for LoopbackPlatform {
    fn name(&self) -> &str {
        "loopback"
    }

    async fn overwrite_commands(
        &self,
        _scope: Scope,
        commands: Vec<CommandDescriptor>,
    ) -> PlatformResult<Vec<RegisteredCommand>> {
        Ok(commands
            .into_iter()
            .map(|command| RegisteredCommand {
                id: CommandId(1000 + self.next_id.fetch_add(1, Ordering::Relaxed)),
                name: command.name,
                kind: command.kind,
            })
            .collect())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn shop_handler(invocation: Arc<CommandInvocation>) {
    match invocation.full_name() {
        "shop search" => {
            let query = invocation
                .argument("query")
                .map(CommandArgument::display_value)
                .unwrap_or_default();
            let hits: Vec<_> = CATALOGUE.iter().filter(|item| item.contains(&*query)).collect();
            info!("Search for {query:?} found {hits:?}");
        }
        "shop buy" => {
            let item = invocation
                .argument("item")
                .map(CommandArgument::display_value)
                .unwrap_or_default();
            let quantity = invocation
                .argument("quantity")
                .and_then(|arg| arg.value.as_i64())
                .unwrap_or(1);
            info!("Order placed: {quantity} x {item}");
        }
        other => warn!("Unknown shop subcommand: {other}"),
    }
}

/// Completes item names for option 0 of every `/shop` subcommand.
async fn complete_item(request: Arc<AutocompleteRequest>) {
    let prefix = request.focused_value.to_lowercase();
    let choices: Vec<_> = CATALOGUE
        .iter()
        .filter(|item| item.starts_with(&prefix))
        .take(AUTOCOMPLETE_CAPACITY)
        .collect();
    info!(
        "Suggestions for {} ({}): {:?}",
        request.full_path, request.focused_option, choices
    );
}

async fn report_message(invocation: Arc<CommandInvocation>) {
    info!("Message reported through {:?}", invocation.data);
}

async fn buy_button(interaction: Arc<ComponentInteraction>) {
    let item = interaction
        .custom_id()
        .trim_start_matches("buy_")
        .parse::<usize>()
        .ok()
        .and_then(|index| CATALOGUE.get(index));
    match item {
        Some(item) => info!("Quick buy: {item}"),
        None => warn!("Quick buy for unknown item {}", interaction.custom_id()),
    }
}

async fn sort_menu(interaction: Arc<ComponentInteraction>) {
    if let ComponentInteraction::SelectMenu { custom_id, values } = interaction.as_ref() {
        info!("Sorting {custom_id} with {values:?}");
    }
}

async fn feedback_modal(interaction: Arc<ComponentInteraction>) {
    if let ComponentInteraction::Modal { fields, .. } = interaction.as_ref() {
        for (field, value) in fields {
            info!("Feedback {field}: {value}");
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn load_config(args: &Args) -> Result<switchboard::runtime::SwitchboardConfig> {
    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let mut config = loader.load()?;

    // Flags win over files and the environment.
    if args.complex {
        config.registry.mode = RegistrationMode::Complex;
    }
    if args.spawn {
        config.dispatch.spawn_per_event = true;
    }
    validate_config(&config)?;
    Ok(config)
}

fn script(id: ScopeId) -> Vec<InteractionEvent> {
    let scope = Some(id);
    vec![
        AutocompleteRequest::new("shop search", scope, "query", "ap").into(),
        AutocompleteRequest::new("shop buy", scope, "item", "b").into(),
        // Option 1 has no completion bound, so the fallback answers.
        AutocompleteRequest::new("shop buy", scope, "quantity", "").into(),
        CommandInvocation::slash(
            "shop search",
            scope,
            vec![CommandArgument::new("query", "an")],
        )
        .into(),
        CommandInvocation::slash(
            "shop buy",
            scope,
            vec![
                CommandArgument::new("item", "cherry"),
                CommandArgument::new("quantity", json!(3)),
            ],
        )
        .into(),
        CommandInvocation::message_context_menu("Report message", None, 9001).into(),
        CommandInvocation::slash("refund", scope, vec![]).into(),
        ComponentInteraction::button("buy_2").into(),
        ComponentInteraction::button("buy_two").into(),
        ComponentInteraction::select_menu("sort_price", vec!["desc".into()]).into(),
        ComponentInteraction::modal(
            "feedback_7",
            vec![("rating".into(), "5".into()), ("comment".into(), "fresh".into())],
        )
        .into(),
        InteractionEvent::ScopeLeft { scope: id },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let scope = ScopeId(args.scope);

    let runtime = InteractionRuntime::from_config(&config, Arc::new(LoopbackPlatform::default()));

    let shop = Command::slash("shop", "Browse and buy items", shop_handler)
        .scoped()
        .options([
            CommandOption::subcommand(
                "search",
                "Search the catalogue",
                [CommandOption::string("query", "What to look for")
                    .required(true)
                    .autocomplete(true)],
            ),
            CommandOption::subcommand(
                "buy",
                "Buy an item",
                [
                    CommandOption::string("item", "Item to buy")
                        .required(true)
                        .autocomplete(true),
                    CommandOption::integer("quantity", "How many"),
                ],
            ),
        ])
        .autocomplete(0, complete_item)
        .build()?;
    runtime.register_command_for_scope(scope, shop)?;
    runtime.register_command(Command::message_context_menu("Report message", report_message).build())?;

    runtime.register_component(Component::button(r"buy_\d+", buy_button).name("quick buy"))?;
    runtime.register_component(Component::select_menu("sort_(price|name)", sort_menu))?;
    runtime.register_component(Component::modal(r"feedback_\d+", feedback_modal))?;

    runtime.sync_commands(Scope::Global, &Selector::All).await?;
    runtime
        .sync_commands(Scope::Scoped(scope), &Selector::names(["shop"]))
        .await?;

    let (events, rx) = runtime.event_channel();
    let feeder = tokio::spawn(async move {
        for event in script(scope) {
            if events.send(event).await.is_err() {
                break;
            }
        }
    });

    let stats = runtime.run_until_signal(rx).await?;
    feeder.await?;

    info!(
        "Processed {} events: {} handled, {} without a handler",
        stats.events, stats.handled, stats.unhandled
    );
    Ok(())
}
