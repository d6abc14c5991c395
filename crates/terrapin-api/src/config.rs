//! Server configuration.
//!
//! Loaded from an optional TOML file; every field has a default. The
//! upstream API key is never read from the file, only from the environment
//! (see [`terrapin_ext_http::API_KEY_ENV`]).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use terrapin_core::ids::Lei;
use terrapin_ext_http::TerrapinConfig;
use terrapin_traits::reference_data::BondSearchFilter;

/// UK government (HM Treasury) LEI.
pub const UK_GOVERNMENT_LEI: &str = "ECTRVYYCEF89VWYS6K36";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the OpenBB widgets document
    #[serde(default = "default_widgets_path")]
    pub widgets_path: PathBuf,

    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Upstream API connection
    #[serde(default)]
    pub upstream: TerrapinConfig,

    /// Schedule query parameters
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Which bonds the schedule covers and from when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Issuer LEIs to search
    #[serde(default = "default_leis")]
    pub leis: Vec<String>,

    /// Interest type classifications to search
    #[serde(default = "default_interest_types")]
    pub interest_types: Vec<String>,

    /// Only payments strictly after this date are scheduled
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: NaiveDate,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_widgets_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/widgets.json"))
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost",
        "http://localhost:1420",
        "http://localhost:5050",
        "https://pro.openbb.dev",
        "https://pro.openbb.co",
        "https://excel.openbb.co",
        "https://excel.openbb.dev",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_leis() -> Vec<String> {
    vec![UK_GOVERNMENT_LEI.to_string()]
}

fn default_interest_types() -> Vec<String> {
    vec!["fixed rate".to_string()]
}

fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            widgets_path: default_widgets_path(),
            cors_origins: default_cors_origins(),
            upstream: TerrapinConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            leis: default_leis(),
            interest_types: default_interest_types(),
            cutoff_date: default_cutoff_date(),
        }
    }
}

impl ScheduleConfig {
    /// Bond search filter for these settings.
    pub fn search_filter(&self) -> BondSearchFilter {
        BondSearchFilter::new(
            self.leis.iter().map(|l| Lei::new(l.as_str())).collect(),
            self.interest_types.clone(),
        )
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `widgets_path` in the file is resolved against the file's
    /// directory, not the working directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if config.widgets_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.widgets_path = dir.join(&config.widgets_path);
            }
        }
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, std::io::Error> {
        toml::from_str(content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
