//! # REST API Interface Layer
//!
//! HTTP endpoints for the spending tracker. This layer handles:
//! - JSON request/response serialization via the `shared` DTOs
//! - Moving blocking store access off the async runtime
//! - Error translation from domain errors to HTTP status codes
//!
//! | error | status |
//! |-------|--------|
//! | `StoreUnavailable` | 503 |
//! | `InvalidSpending`, `InvalidDate`, `MonthOutOfRange` | 400 |

pub mod balance_apis;
pub mod mappers;
pub mod overview_apis;

#[cfg(test)]
pub mod test_utils;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::domain::errors::{OverviewError, OverviewResult};
use shared::ErrorResponse;

/// Status code a domain error is reported with
pub fn status_for(error: &OverviewError) -> StatusCode {
    match error {
        OverviewError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        OverviewError::InvalidSpending(_)
        | OverviewError::InvalidDate(_)
        | OverviewError::MonthOutOfRange { .. } => StatusCode::BAD_REQUEST,
    }
}

pub fn error_response(error: &OverviewError) -> Response {
    let status = status_for(error);
    if status.is_server_error() {
        error!("Request failed: {}", error);
    } else {
        warn!("Rejected request: {}", error);
    }
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Run a blocking domain operation on tokio's blocking pool
pub async fn run_blocking<T, F>(operation: F) -> Result<T, Response>
where
    F: FnOnce() -> OverviewResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            error!("Blocking task failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SpendingValidationError;
    use anyhow::anyhow;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&OverviewError::store(anyhow!("disk full"))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&OverviewError::InvalidSpending(SpendingValidationError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&OverviewError::InvalidDate("tomorrow".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&OverviewError::MonthOutOfRange { year: 262143, month: 12, delta: 1 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_run_blocking_maps_errors() {
        let ok = run_blocking(|| Ok(7)).await;
        assert_eq!(ok.ok(), Some(7));

        let failed = run_blocking::<(), _>(|| Err(OverviewError::store(anyhow!("gone")))).await;
        assert_eq!(failed.unwrap_err().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
