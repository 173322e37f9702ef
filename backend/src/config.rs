//! # Application Configuration
//!
//! Settings for the spending tracker server, read from a single YAML file.
//!
//! ```yaml
//! data_directory: "data"
//! bind_address: "127.0.0.1:3000"
//! utc_offset_minutes: 60
//! log_level: "info"
//! allowed_origin: "http://localhost:8080"
//! ```
//!
//! Every key is optional. The file itself is optional too: when it does not
//! exist the defaults below are used.

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "SPENDING_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "spending_tracker.yaml";

/// Largest offset any real zone uses, in minutes
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `spending.csv` and `balance.yaml`
    pub data_directory: PathBuf,
    pub bind_address: SocketAddr,
    /// Zone used to decide which calendar day a purchase belongs to
    pub utc_offset_minutes: i32,
    /// Default filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Origin allowed to call the API from a browser
    pub allowed_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            utc_offset_minutes: 0,
            log_level: "info".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$SPENDING_TRACKER_CONFIG`, or `spending_tracker.yaml` in the
    /// working directory
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from `path`, falling back to defaults if the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_yaml(&yaml_content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        // An empty file deserializes to unit rather than a mapping
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(yaml_content)?;
        config.reference_zone()?;
        Ok(config)
    }

    /// The fixed offset calendar dates are computed in
    pub fn reference_zone(&self) -> Result<FixedOffset> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            bail!(
                "utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES,
                self.utc_offset_minutes
            );
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .with_context(|| format!("invalid utc_offset_minutes {}", self.utc_offset_minutes))
    }
}
