//! Database initialization binary.
//!
//! Creates the `SQLite` schema and seeds the mechanic roster from
//! `config.toml`. Run once before first use (or any time; both steps are
//! idempotent). The serving layer is a separate process that only needs
//! the resulting database file.

use dotenvy::dotenv;
use garage_backoffice::config::{database, mechanics};
use garage_backoffice::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal; env vars can be set externally
    dotenv().ok();

    let config = mechanics::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        mechanics = config.mechanics.len(),
        "Configuration loaded successfully."
    );

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize schema: {}", e))?;

    let seeded = mechanics::seed_initial_mechanics(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed mechanics: {}", e))?;
    info!(seeded, "Initial mechanics seeded successfully.");

    Ok(())
}
