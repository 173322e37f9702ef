use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spending_tracker_backend::{create_router, initialize_backend, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting spending tracker with {:?}", config);
    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, &config.allowed_origin)?;

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
