/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use tempfile::TempDir;

use super::balance_repository::BalanceRepository;
use super::connection::CsvConnection;
use super::spending_repository::SpendingRepository;
use crate::domain::models::SpendingRecord;
use crate::storage::traits::SpendingStorage;

/// Test environment that provides a temporary directory and connection
/// that will be automatically cleaned up when the environment is dropped,
/// even if tests panic or fail.
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

/// Test helper that provides repository instances for a test environment
pub struct TestHelper {
    pub env: TestEnvironment,
    pub spending_repo: SpendingRepository,
    pub balance_repo: BalanceRepository,
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory, grouping
    /// dates in UTC
    pub fn new() -> Result<Self> {
        Self::with_zone(utc_offset())
    }

    pub fn with_zone(zone: FixedOffset) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path(), zone)?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

impl TestHelper {
    /// Create a new test helper with a fresh environment
    pub fn new() -> Result<Self> {
        Self::from_env(TestEnvironment::new()?)
    }

    pub fn with_zone(zone: FixedOffset) -> Result<Self> {
        Self::from_env(TestEnvironment::with_zone(zone)?)
    }

    /// Create a new test helper with an existing environment
    pub fn from_env(env: TestEnvironment) -> Result<Self> {
        let spending_repo = SpendingRepository::new(env.connection.clone());
        let balance_repo = BalanceRepository::new(env.connection.clone());

        Ok(Self {
            env,
            spending_repo,
            balance_repo,
        })
    }

    /// Store a record with the given price at an RFC 3339 timestamp
    pub fn create_spending(&self, name: &str, price: f64, rfc3339: &str) -> Result<SpendingRecord> {
        let record = SpendingRecord::new(name, price, 0.0, 1.0, parse_utc(rfc3339)?)?;
        self.spending_repo.insert_spending(&record)
    }
}

pub fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

pub fn parse_utc(rfc3339: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(rfc3339)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
            // Environment dropped here
        }
        assert!(!base_path.exists());
        Ok(())
    }

    #[test]
    fn test_repository_helper() -> Result<()> {
        let helper = TestHelper::new()?;

        let record = helper.create_spending("Test Item", 4.0, "2024-03-05T09:00:00Z")?;
        assert_eq!(record.name, "Test Item");
        assert!(record.id.is_some());
        Ok(())
    }
}
