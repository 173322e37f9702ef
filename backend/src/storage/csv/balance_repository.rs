//! # Balance Repository
//!
//! Keeps the user's raw balance in a small YAML file next to the ledger:
//!
//! ```yaml
//! balance: 100.0
//! updated_at: "2024-03-05T09:00:00Z"
//! ```
//!
//! A missing file means the balance was never set and reads as 0.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, info};

use super::connection::CsvConnection;
use crate::storage::traits::BalanceStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BalanceFile {
    balance: f64,
    updated_at: String,
}

/// YAML-backed store for the single raw balance value
#[derive(Clone)]
pub struct BalanceRepository {
    connection: CsvConnection,
}

impl BalanceRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl BalanceStorage for BalanceRepository {
    fn get_raw_balance(&self) -> Result<f64> {
        let path = self.connection.balance_file_path();
        if !path.exists() {
            debug!("No balance file at {:?}, balance is 0", path);
            return Ok(0.0);
        }

        let yaml_content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let file: BalanceFile = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(file.balance)
    }

    fn set_raw_balance(&self, balance: f64) -> Result<()> {
        let _guard = self.connection.lock_for_write();

        let file = BalanceFile {
            balance,
            updated_at: Utc::now().to_rfc3339(),
        };
        let yaml_content = serde_yaml::to_string(&file)?;
        self.connection
            .write_atomically(&self.connection.balance_file_path(), yaml_content.as_bytes())?;

        info!("Saved raw balance {:.2}", balance);
        Ok(())
    }
}
