//! fundflow - account-to-account transfer service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌──────────┐
//! │  Config  │───▶│ Gateway  │───▶│ Orchestrator │───▶│  Store   │
//! │  (YAML)  │    │  (axum)  │    │ (keyed locks)│    │(mem / pg)│
//! └──────────┘    └──────────┘    └──────────────┘    └──────────┘
//! ```
//!
//! Flags: `--env <name>` / `-e <name>` selects `config/<name>.yaml`
//! (default `dev`), `--port <n>` overrides the gateway port.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use fundflow::account::{AccountId, AccountService};
use fundflow::config::{AppConfig, StoreBackend, StoreConfig};
use fundflow::db::Database;
use fundflow::gateway::{self, AppState};
use fundflow::keyed_lock::KeyedLockManager;
use fundflow::store::{LedgerStore, MemoryStore, PgStore};
use fundflow::transfer::TransferOrchestrator;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .postgres_url
                .as_deref()
                .context("store.postgres_url is not set")?;
            let db = Database::connect(url, config.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.health_check()
                .await
                .context("PostgreSQL health check failed")?;

            let mut store = PgStore::new(db.pool().clone());
            if let Some(key) = config.advisory_lock_key {
                tracing::info!(advisory_lock_key = key, "Cross-process apply lock enabled");
                store = store.with_advisory_lock(key);
            }
            store.migrate().await.context("Schema migration failed")?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config =
        AppConfig::load(&env).with_context(|| format!("Failed to load config for env {env}"))?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }

    let _log_guard = fundflow::logging::init_logging(&app_config);
    tracing::info!(git_hash = env!("GIT_HASH"), "Starting fundflow in {} mode", env);

    let store = open_store(&app_config.store).await?;

    let locks = KeyedLockManager::<AccountId>::with_pool_capacity(app_config.locks.pool_capacity);
    let mut orchestrator = TransferOrchestrator::new(store.clone(), locks);
    if let Some(ms) = app_config.locks.acquire_timeout_ms {
        orchestrator = orchestrator.with_lock_timeout(Duration::from_millis(ms));
    }

    let state = Arc::new(AppState::new(
        Arc::new(orchestrator),
        Arc::new(AccountService::new(store)),
    ));

    gateway::run_server(&app_config.gateway, state)
        .await
        .context("Gateway server error")?;

    tracing::info!("fundflow stopped");
    Ok(())
}
