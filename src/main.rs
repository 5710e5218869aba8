//! Ledger bootstrap binary.
//!
//! Initializes tracing, loads settings, opens the database, creates the
//! schema, and seeds the first admin account. The interactive front end is a
//! separate concern; this binary brings the store to a usable state.

use dotenvy::dotenv;
use rukun_ledger::config::{database, settings};
use rukun_ledger::errors::Result;
use rukun_ledger::store::Store;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Resolve settings from env + optional config.toml
    let app_settings = settings::load_settings("config.toml")?;
    info!(
        database_url = %app_settings.database_url,
        monthly_due = app_settings.monthly_due,
        "Resolved ledger settings."
    );

    // 4. Open the database and create the schema
    let db = database::create_connection(&app_settings.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| warn!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))?;

    // 5. Seed the bootstrap admin on first run
    if database::seed_default_admin(&db).await? {
        warn!("Seeded default 'admin' account; change its password before real use.");
    }

    let _store = Store::new(db, &app_settings);
    info!("Ledger store initialized and ready.");

    Ok(())
}
