//! Laundry Hub gateway
//!
//! ```text
//! config/{env}.yaml ──▶ logging ──▶ store (PostgreSQL | in-memory) ──▶ AppState ──▶ axum
//! ```
//!
//! Usage: `laundry_hub [--env dev] [--port 8080] [--seed]`
//!
//! `--seed` loads the demo dataset into the in-memory store; for PostgreSQL
//! use the `seed` binary instead.

use std::sync::Arc;

use anyhow::Context;

use laundry_hub::config::AppConfig;
use laundry_hub::db::Database;
use laundry_hub::gateway::{self, state::AppState};
use laundry_hub::logging::init_logging;
use laundry_hub::persistence::{MemoryStore, PgStore, demo_data};

fn get_arg(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1).cloned())
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_arg(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string());
    let mut config = AppConfig::load(&env)?;
    if let Some(port) = get_arg(&["--port"]) {
        config.gateway.port = port
            .parse()
            .with_context(|| format!("Invalid --port value: {}", port))?;
    }

    let _guard = init_logging(&config);
    tracing::info!(
        env = %env,
        status_policy = ?config.orders.status_policy,
        "Starting laundry_hub"
    );

    let state = match &config.postgres_url {
        Some(url) => {
            if has_flag("--seed") {
                tracing::warn!("--seed only applies to the in-memory store; run the seed binary");
            }
            let db = Arc::new(
                Database::connect(url)
                    .await
                    .context("Failed to connect to PostgreSQL")?,
            );
            AppState::new(
                Arc::new(PgStore::new(db.pool().clone())),
                Some(db),
                config.jwt.secret.clone(),
                config.jwt.expiry_hours,
                config.orders.status_policy,
            )
        }
        None => {
            tracing::warn!("No postgres_url configured; using the in-memory store");
            let store = MemoryStore::new();
            if has_flag("--seed") {
                let data = demo_data().context("Failed to build demo dataset")?;
                store.load(&data).context("Failed to load demo dataset")?;
                tracing::info!(
                    laundries = data.laundries.len(),
                    orders = data.orders.len(),
                    "demo dataset loaded"
                );
            }
            AppState::new(
                Arc::new(store),
                None,
                config.jwt.secret.clone(),
                config.jwt.expiry_hours,
                config.orders.status_policy,
            )
        }
    };

    gateway::run_server(&config.gateway, Arc::new(state)).await
}
