use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::NaiveDate;
use tracing::info;

use super::mappers::{OverviewMapper, SpendingMapper};
use super::run_blocking;
use crate::domain::errors::OverviewError;
use crate::AppState;
use shared::{ChangeMonthRequest, CreateSpendingRequest, SelectDateRequest};

/// Create a router for the overview and spending APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(load_overview))
        .route("/overview/date", post(select_date))
        .route("/overview/month", post(change_month))
        .route("/spending", post(create_spending))
        .route("/spending/:id", delete(delete_spending))
}

/// Reload from the stores, selecting the most recent date with spending
async fn load_overview(State(state): State<AppState>) -> Response {
    info!("GET /api/overview");
    let service = state.overview_service.clone();
    match run_blocking(move || service.load_overview()).await {
        Ok(snapshot) => Json(OverviewMapper::to_dto(&snapshot)).into_response(),
        Err(response) => response,
    }
}

async fn select_date(
    State(state): State<AppState>,
    Json(request): Json<SelectDateRequest>,
) -> Response {
    info!("POST /api/overview/date - request: {:?}", request);

    let date = match NaiveDate::parse_from_str(&request.date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            let error = OverviewError::InvalidDate(format!("'{}': {}", request.date, e));
            return super::error_response(&error);
        }
    };

    let service = state.overview_service.clone();
    match run_blocking(move || service.select_date(date)).await {
        Ok(snapshot) => Json(OverviewMapper::to_dto(&snapshot)).into_response(),
        Err(response) => response,
    }
}

async fn change_month(
    State(state): State<AppState>,
    Json(request): Json<ChangeMonthRequest>,
) -> Response {
    info!("POST /api/overview/month - delta: {}", request.delta);
    let service = state.overview_service.clone();
    match run_blocking(move || service.change_month(request.delta)).await {
        Ok(snapshot) => Json(OverviewMapper::to_dto(&snapshot)).into_response(),
        Err(response) => response,
    }
}

async fn create_spending(
    State(state): State<AppState>,
    Json(request): Json<CreateSpendingRequest>,
) -> Response {
    info!("POST /api/spending - request: {:?}", request);

    let command = match SpendingMapper::to_command(request) {
        Ok(command) => command,
        Err(e) => return super::error_response(&e),
    };

    let service = state.overview_service.clone();
    match run_blocking(move || service.create_spending(command)).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(OverviewMapper::to_dto(&snapshot))).into_response(),
        Err(response) => response,
    }
}

/// Deleting an id that does not exist still succeeds
async fn delete_spending(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    info!("DELETE /api/spending/{}", id);
    let service = state.overview_service.clone();
    match run_blocking(move || service.delete_spending(id)).await {
        Ok(snapshot) => Json(OverviewMapper::to_dto(&snapshot)).into_response(),
        Err(response) => response,
    }
}
