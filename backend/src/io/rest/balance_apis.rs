use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::info;

use super::mappers::OverviewMapper;
use super::run_blocking;
use crate::AppState;
use shared::UpdateBalanceRequest;

/// Create a router for balance related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/balance", get(get_balance).put(update_balance))
}

async fn get_balance(State(state): State<AppState>) -> Response {
    info!("GET /api/balance");
    let service = state.balance_service.clone();
    match run_blocking(move || service.current_balance()).await {
        Ok(summary) => Json(OverviewMapper::balance_to_dto(&summary)).into_response(),
        Err(response) => response,
    }
}

/// Store whatever the user typed; non-numeric text becomes 0
async fn update_balance(
    State(state): State<AppState>,
    Json(request): Json<UpdateBalanceRequest>,
) -> Response {
    info!("PUT /api/balance - input: {:?}", request.balance);
    let service = state.overview_service.clone();
    match run_blocking(move || service.set_raw_balance(request.balance)).await {
        Ok(snapshot) => Json(OverviewMapper::balance_to_dto(&snapshot.balance)).into_response(),
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_balance() {
        let app = TestApp::with_scenario().unwrap();

        let (status, body) = app.request(Method::GET, "/api/balance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw_balance": 100.0, "balance": 65.0 }));
    }

    #[tokio::test]
    async fn test_get_balance_on_empty_store() {
        let app = TestApp::new().unwrap();

        let (status, body) = app.request(Method::GET, "/api/balance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw_balance": 0.0, "balance": 0.0 }));
    }

    #[tokio::test]
    async fn test_update_balance() {
        let app = TestApp::with_scenario().unwrap();

        let (status, body) = app
            .request(Method::PUT, "/api/balance", Some(json!({ "balance": "120" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw_balance": 120.0, "balance": 85.0 }));

        let (_, overview) = app.request(Method::POST, "/api/overview/month", Some(json!({ "delta": 0 }))).await;
        assert_eq!(overview["balance"], 85.0);
    }

    #[tokio::test]
    async fn test_update_balance_with_text_stores_zero() {
        let app = TestApp::with_scenario().unwrap();

        let (status, body) = app
            .request(Method::PUT, "/api/balance", Some(json!({ "balance": "a lot" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw_balance": 0.0, "balance": -35.0 }));

        let (_, fetched) = app.request(Method::GET, "/api/balance", None).await;
        assert_eq!(fetched, body);
    }
}
