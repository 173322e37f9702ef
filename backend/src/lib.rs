//! # Spending Tracker Backend
//!
//! Contains all non-UI logic for the spending tracker.
//!
//! - **Domain**: Aggregation, balance and calendar layout
//! - **Storage**: The ledger and balance files
//! - **IO**: REST API exposing the overview to a UI
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (any HTTP client)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (overview actions, grid, balance)
//!     ↓
//! Storage Layer (CSV ledger, YAML balance)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use config::AppConfig;

use crate::domain::{BalanceService, SpendingOverviewService};
use crate::io::rest::{balance_apis, overview_apis};
use crate::storage::csv::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub overview_service: SpendingOverviewService<CsvConnection>,
    pub balance_service: BalanceService<CsvConnection>,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let zone = config.reference_zone()?;

    info!("Setting up data directory {}", config.data_directory.display());
    let connection = Arc::new(CsvConnection::new(&config.data_directory, zone)?);

    info!("Setting up domain model (dates in UTC{})", zone);
    let overview_service = SpendingOverviewService::new(Arc::clone(&connection), zone);
    let balance_service = BalanceService::new(connection);

    Ok(AppState {
        overview_service,
        balance_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(
            allowed_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid allowed_origin '{}'", allowed_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(overview_apis::router())
        .merge(balance_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_backend_creates_data_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = AppConfig {
            data_directory: temp_dir.path().join("ledger"),
            utc_offset_minutes: 120,
            ..AppConfig::default()
        };

        let app_state = initialize_backend(&config)?;
        assert!(config.data_directory.exists());
        assert!(app_state.overview_service.snapshot().is_none());
        create_router(app_state, &config.allowed_origin)?;
        Ok(())
    }

    #[test]
    fn test_invalid_origin_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = AppConfig {
            data_directory: temp_dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let app_state = initialize_backend(&config)?;
        assert!(create_router(app_state, "bad\norigin").is_err());
        Ok(())
    }
}
