//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::SpendingRecord;

/// Trait defining the interface for the ledger of spending records
///
/// All operations are synchronous; callers that live on an async runtime are
/// expected to move them onto a blocking thread.
pub trait SpendingStorage: Send + Sync {
    /// Store a new record and return it with its assigned id.
    /// Any id already present on the input is ignored.
    fn insert_spending(&self, record: &SpendingRecord) -> Result<SpendingRecord>;

    /// Every record ever stored, oldest entry first
    fn list_all_spending(&self) -> Result<Vec<SpendingRecord>>;

    /// Records whose calendar date in the store's reference zone equals `date`,
    /// in the order they were entered
    fn list_spending_by_date(&self, date: NaiveDate) -> Result<Vec<SpendingRecord>>;

    /// One entry per date that has at least one record, ascending
    fn list_distinct_dates(&self) -> Result<Vec<NaiveDate>>;

    /// Delete a single record
    /// Returns true if the record was found and deleted, false otherwise
    fn delete_spending(&self, id: i64) -> Result<bool>;
}

/// Trait defining the interface for the single raw balance value
pub trait BalanceStorage: Send + Sync {
    /// The stored raw balance; 0.0 when nothing was ever saved
    fn get_raw_balance(&self) -> Result<f64>;

    fn set_raw_balance(&self, balance: f64) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides factory
/// methods for creating repositories, so the domain layer can work with any
/// storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of SpendingStorage this connection creates
    type SpendingRepository: SpendingStorage + Clone;

    /// The type of BalanceStorage this connection creates
    type BalanceRepository: BalanceStorage + Clone;

    /// Create a new spending repository for this connection
    fn create_spending_repository(&self) -> Self::SpendingRepository;

    /// Create a new balance repository for this connection
    fn create_balance_repository(&self) -> Self::BalanceRepository;
}
