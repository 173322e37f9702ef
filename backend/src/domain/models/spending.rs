//! Domain model for a spending record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a spending record can be rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpendingValidationError {
    #[error("spending name must not be empty")]
    EmptyName,
    #[error("{field} must be a non-negative number, got {value}")]
    NegativeOrInvalid { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRecord {
    /// Assigned by the ledger store; `None` until the record is saved
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub kilograms: f64,
    pub quantity: f64,
    pub date_time_utc: DateTime<Utc>,
}

impl SpendingRecord {
    /// Build an unsaved record, enforcing that price, kilograms and quantity
    /// are finite and non-negative.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        kilograms: f64,
        quantity: f64,
        date_time_utc: DateTime<Utc>,
    ) -> Result<Self, SpendingValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpendingValidationError::EmptyName);
        }
        for (field, value) in [("price", price), ("kilograms", kilograms), ("quantity", quantity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpendingValidationError::NegativeOrInvalid { field, value });
            }
        }

        Ok(Self {
            id: None,
            name: name.trim().to_string(),
            price,
            kilograms,
            quantity,
            date_time_utc,
        })
    }

    /// Return a copy carrying the identifier the store assigned.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
