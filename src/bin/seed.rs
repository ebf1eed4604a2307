//! Load the demo dataset into PostgreSQL
//!
//! Usage:
//!   cargo run --bin seed -- --env dev
//!
//! Needs `postgres_url` in the config (or `DATABASE_URL`) and an applied
//! `sql/schema.sql`. Everything is inserted in one transaction; running it
//! twice fails on the unique email index and leaves the first load intact.

use anyhow::Context;
use laundry_hub::config::AppConfig;
use laundry_hub::db::Database;
use laundry_hub::logging::init_logging;
use laundry_hub::persistence::{PgStore, demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let env = match args.as_slice() {
        [_, flag, env, ..] if flag == "--env" || flag == "-e" => env.clone(),
        _ => "dev".to_string(),
    };

    let config = AppConfig::load(&env)?;
    let _guard = init_logging(&config);

    let url = config
        .postgres_url
        .as_deref()
        .context("postgres_url is not configured; set it in the config or DATABASE_URL")?;
    let db = Database::connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    let data = demo_data().context("Failed to build demo dataset")?;
    PgStore::new(db.pool().clone())
        .seed(&data)
        .await
        .context("Seeding failed; transaction rolled back")?;

    eprintln!(
        "Seeded {} users, {} laundries, {} services, {} orders",
        data.users.len(),
        data.laundries.len(),
        data.service_count(),
        data.orders.len()
    );
    for user in &data.users {
        eprintln!("  {} ({})", user.email, user.role);
    }
    Ok(())
}
