use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use super::balance_repository::BalanceRepository;
use super::spending_repository::SpendingRepository;
use crate::storage::traits::Connection;

pub const SPENDING_FILE_NAME: &str = "spending.csv";
pub const BALANCE_FILE_NAME: &str = "balance.yaml";
/// Holds the next spending id, so ids of deleted records are never handed out again
pub const SPENDING_SEQUENCE_FILE_NAME: &str = "spending_sequence.yaml";
pub const SPENDING_CSV_HEADER: &str = "id,name,price,kilograms,quantity,date_time_utc\n";

/// CsvConnection manages the data directory and the files inside it
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<PathBuf>,
    /// Zone whose calendar dates `list_spending_by_date` matches against
    reference_zone: FixedOffset,
    /// Held for every read-modify-write cycle on the data files
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P, reference_zone: FixedOffset) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("creating data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
            reference_zone,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn reference_zone(&self) -> FixedOffset {
        self.reference_zone
    }

    pub fn spending_file_path(&self) -> PathBuf {
        self.base_directory.join(SPENDING_FILE_NAME)
    }

    pub fn balance_file_path(&self) -> PathBuf {
        self.base_directory.join(BALANCE_FILE_NAME)
    }

    pub fn spending_sequence_file_path(&self) -> PathBuf {
        self.base_directory.join(SPENDING_SEQUENCE_FILE_NAME)
    }

    /// Ensure the spending CSV exists with its header row
    pub fn ensure_spending_file_exists(&self) -> Result<()> {
        let file_path = self.spending_file_path();

        if !file_path.exists() {
            fs::write(&file_path, SPENDING_CSV_HEADER)
                .with_context(|| format!("creating {}", file_path.display()))?;
        }

        Ok(())
    }

    /// Serialize read-modify-write cycles across repository clones
    pub fn lock_for_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write `contents` next to `path` and rename it into place
    pub fn write_atomically(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("writing {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type SpendingRepository = SpendingRepository;
    type BalanceRepository = BalanceRepository;

    fn create_spending_repository(&self) -> Self::SpendingRepository {
        SpendingRepository::new(self.clone())
    }

    fn create_balance_repository(&self) -> Self::BalanceRepository {
        BalanceRepository::new(self.clone())
    }
}
