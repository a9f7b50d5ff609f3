use dotenvy::dotenv;
use staffing_buddy::{
    api::{self, AppState},
    config::{app, database},
    core::employee,
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = app::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed configured employees
    employee::seed_employees(&db, &app_config.employees)
        .await
        .inspect_err(|e| error!("Failed to seed employees: {}", e))?;

    // 6. Serve
    let bind_address = app_config.server.bind_address.clone();
    let state = AppState::new(Arc::new(db), Arc::new(app_config));
    api::serve(state, &bind_address).await
}
