#[macro_use]
extern crate diesel;

use std::{error::Error, path::Path, sync::Arc, time::Duration};

use clap::Parser;
use opentelemetry::{sdk::{trace, Resource}, KeyValue};
use serenity::{client::Client, framework::StandardFramework, model::gateway::GatewayIntents};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

mod bot;
mod catalog;
mod cmd;
mod config;
mod cooldown;
mod error;
mod messages;
mod models;
mod schema;
mod select;
mod store;

use bot::Bot;
use catalog::Catalog;
use cmd::BotState;
use config::{Config, TracingConfig};
use cooldown::CooldownTracker;
use select::Selector;
use store::Store;

#[derive(Parser, Debug)]
#[command(version, author, about)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

/// Installs the log subscriber, exporting spans to Jaeger when configured.
///
/// Returns whether Jaeger export is on.
fn install_tracing(config: Option<&TracingConfig>) -> Result<bool, Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(tracing_subscriber::fmt::layer()).with(filter);

    match config.and_then(|t| t.jaeger.as_deref()) {
        Some(jaeger) => {
            let tracer = opentelemetry_jaeger::new_agent_pipeline()
                .with_endpoint(jaeger)
                .with_service_name("battle-buddy")
                .with_trace_config(trace::config().with_resource(Resource::new(vec![
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])))
                .install_simple()?;
            let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);
            tracing::subscriber::set_global_default(subscriber.with(telemetry))?;
            tracing::info!(jaeger, "Installed jaeger tracing");
            Ok(true)
        }
        None => {
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config_found = Path::new(&args.config).exists();
    let config = if config_found {
        config::load_config(&args.config).map_err(|e| format!("Failed to load {}: {}", args.config, e))?
    } else {
        Config::default()
    };

    let jaeger = install_tracing(config.tracing_config.as_ref())?;
    if !config_found {
        tracing::warn!(path = %args.config, "Config file not found, using defaults");
    }

    let token = config
        .token()
        .ok_or("No discord token: set auth.token in the config file or DISCORD_TOKEN")?;

    // Bad rosters must stop the bot before it connects
    let catalog = match config.bot_config.roster {
        Some(ref path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
    .map_err(|e| format!("Invalid roster: {}", e))?;
    tracing::info!(games = ?catalog.games(), "Roster loaded");

    tracing::info!("Opening database...");
    let store = Arc::new(Store::open(&config.db_config.database_url, config.db_config.max_connections)?);

    let state = BotState {
        selector: Selector::new(Arc::new(catalog), store.clone()),
        store,
        cooldowns: CooldownTracker::new(),
        cooldown: Duration::from_secs(config.bot_config.cooldown),
    };

    // Create client instance
    tracing::info!("Connecting to discord...");
    let framework = StandardFramework::new()
        .configure(|c| c.prefix(config.bot_config.command_prefix.as_str()))
        .group(&bot::GENERAL_GROUP)
        .help(&bot::CMD_HELP)
        .before(bot::before)
        .after(bot::after)
        .on_dispatch_error(bot::dispatch_error);

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&token, intents)
        .event_handler(Bot)
        .framework(framework)
        .await?;
    client.data.write().await.insert::<BotState>(Arc::new(state));

    tracing::info!("Running app...");
    let result = client.start().await;

    if jaeger {
        opentelemetry::global::shutdown_tracer_provider();
    }
    Ok(result?)
}
