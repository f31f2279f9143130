//! Hookrelay Server
//!
//! Delivers domain events to registered webhook subscriptions and keeps an
//! audit log of every attempt.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use hookrelay_core::events::deliver_webhook_channel;
use hookrelay_core::processors::DeliveryWorker;
use hookrelay_core::store::{PgWebhookStore, WebhookStore};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Hookrelay - webhook delivery service
#[derive(Parser, Debug)]
#[command(name = "hookrelay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./hookrelay-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting hookrelay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let shared_config = loaded_config.into_shared();

    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    let store: Arc<dyn WebhookStore> = Arc::new(PgWebhookStore::new(db_pool.clone()));

    // Delivery worker
    let (task_tx, task_rx) = deliver_webhook_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let delivery_config = shared_config.delivery.clone();
    let delivery_watcher = delivery_config.subscribe();
    let worker = tokio::spawn(DeliveryWorker::new(store.clone()).run(
        shutdown_rx,
        task_rx,
        delivery_config,
        delivery_watcher,
    ));

    let state = AppState::new(store, shared_config, task_tx);

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify = spawn_config_reload_handler(state.clone(), config_loader);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    reload_notify.notify_one();

    // The server has stopped taking requests and every request it accepted
    // has its answer, so the worker is idle by now. In-flight deliveries
    // still finish and are recorded before the pool closes.
    tracing::info!("Waiting for delivery worker...");
    if shutdown_tx.send(true).is_err() {
        tracing::debug!("Delivery worker already stopped");
    }
    if let Err(e) = worker.await {
        tracing::error!("Delivery worker terminated abnormally: {}", e);
    }

    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
