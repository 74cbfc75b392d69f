//! Dashboard configuration loaded from TOML
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration:
//!
//! ```toml
//! data_file = "Spend.xlsx"
//! horizon_days = 30
//! currency_symbol = "R"
//! export_dir = "."
//! export_prefix = "petrol_data"
//! ```

use crate::error::{AnalyticsError, Result};
use crate::export::DEFAULT_EXPORT_PREFIX;
use crate::forecast::DEFAULT_HORIZON_DAYS;
use crate::insights::DEFAULT_CURRENCY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Spreadsheet read when no source is configured
pub const DEFAULT_DATA_FILE: &str = "Spend.xlsx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Source spreadsheet (CSV, xlsx, xls or ods)
    pub data_file: PathBuf,
    /// Days to forecast past the last purchase
    pub horizon_days: usize,
    /// Symbol prefixed to monetary amounts in insights
    pub currency_symbol: String,
    /// Directory that exports are written to
    pub export_dir: PathBuf,
    /// File name prefix of exports
    pub export_prefix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            horizon_days: DEFAULT_HORIZON_DAYS,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
            export_dir: PathBuf::from("."),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            AnalyticsError::Config(format!("Cannot read {}: {}", path.display(), err))
        })?;

        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "Loaded dashboard config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(AnalyticsError::Config(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.export_prefix.trim().is_empty() {
            return Err(AnalyticsError::Config(
                "export_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
