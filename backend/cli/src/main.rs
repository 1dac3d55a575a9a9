mod api;
mod components;
mod memory_cmd;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use recall_agent::{Dispatcher, MentionStripper, ThreadStates};
use recall_channels::{ChannelAdapter, SlackAdapter, SlackClient, SlackConfig};
use recall_config::RecallConfig;
use recall_core::EventBus;

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Recall: a Slack bot that remembers your threads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Slack webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer one query with the retrieval pipeline and print the reply
    Ask {
        query: String,
    },
    /// Store texts as documents and print their ids
    Remember {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = recall_config::from_env()?;
    recall_logging::init_logger(config.logging.log_dir.as_deref(), &config.logging.level);
    recall_config::ensure_valid(&config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Ask { query } => memory_cmd::ask(&config, &query).await?,
        Commands::Remember { texts } => memory_cmd::remember(&config, &texts).await?,
    }

    Ok(())
}

async fn run_server(config: RecallConfig) -> Result<()> {
    let (bot_token, signing_secret) = components::slack_credentials(&config)?;

    info!(
        port = config.server.port,
        bind = %config.server.bind_address,
        db = %config.store.db_path,
        "Starting Recall"
    );

    let slack = Arc::new(SlackClient::new(bot_token));
    let bot_user_id = match config.slack.bot_user_id.clone() {
        Some(id) => Some(id),
        None => match slack.auth_test().await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = ?e, "Could not resolve bot user id; stripping any user mention");
                None
            }
        },
    };

    let pipeline = components::query_pipeline(&config)?;

    // Initialize event bus
    let mut bus = EventBus::new();
    let dispatcher_rx = bus
        .take_dispatcher_rx()
        .context("dispatcher receiver already taken")?;

    let dispatcher = Dispatcher::new(
        slack.clone(),
        pipeline,
        ThreadStates::new(
            Duration::from_secs(config.threads.ttl_secs),
            config.threads.max_threads,
        ),
        MentionStripper::new(bot_user_id.as_deref()),
    );
    tokio::spawn(async move {
        dispatcher.start(dispatcher_rx).await;
    });

    let adapter = SlackAdapter::new(
        SlackConfig {
            signing_secret,
            events_path: config.server.events_path.clone(),
            interactions_path: config.server.interactions_path.clone(),
        },
        bus.dispatcher_tx.clone(),
    );
    adapter.start().await?;
    info!(adapter = adapter.name(), "Registered channel adapter");

    let app = api::build_router(adapter.build_router());
    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
