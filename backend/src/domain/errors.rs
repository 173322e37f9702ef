use thiserror::Error;

use crate::domain::models::SpendingValidationError;

/// Failures surfaced by the domain services.
#[derive(Debug, Error)]
pub enum OverviewError {
    /// The ledger or balance store could not be read or written
    #[error("store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),
    #[error("invalid spending: {0}")]
    InvalidSpending(#[from] SpendingValidationError),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// Month navigation left the range of representable dates
    #[error("month out of range: {year}-{month} stepped by {delta}")]
    MonthOutOfRange { year: i32, month: u32, delta: i32 },
}

impl OverviewError {
    pub fn store(error: anyhow::Error) -> Self {
        OverviewError::StoreUnavailable(error)
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, OverviewError::StoreUnavailable(_))
    }
}

pub type OverviewResult<T> = Result<T, OverviewError>;
