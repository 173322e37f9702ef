/// Router test harness: a full app over a temporary data directory, driven
/// request by request through `tower::ServiceExt::oneshot`.
use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::domain::{BalanceService, SpendingOverviewService};
use crate::storage::csv::test_utils::{utc_offset, TestHelper};
use crate::storage::BalanceStorage;
use crate::{create_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub helper: TestHelper,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let helper = TestHelper::new()?;
        let connection = Arc::new(helper.env.connection.clone());
        let app_state = AppState {
            overview_service: SpendingOverviewService::new(Arc::clone(&connection), utc_offset()),
            balance_service: BalanceService::new(connection),
        };
        let router = create_router(app_state, "http://localhost:8080")?;
        Ok(Self { router, helper })
    }

    /// Raw balance 100 with 10 and 5 on March 5th 2024 and 20 on March 31st
    pub fn with_scenario() -> Result<Self> {
        let app = Self::new()?;
        app.helper.balance_repo.set_raw_balance(100.0)?;
        app.helper.create_spending("Bread", 10.0, "2024-03-05T09:00:00Z")?;
        app.helper.create_spending("Milk", 5.0, "2024-03-05T18:30:00Z")?;
        app.helper.create_spending("Shoes", 20.0, "2024-03-31T12:00:00Z")?;
        Ok(app)
    }

    /// Send one request and decode the JSON body (`Null` when empty)
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
