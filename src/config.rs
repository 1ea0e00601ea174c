use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "hospdash.json";

pub const DEFAULT_DATA_URL: &str = "https://data.cdc.gov/api/views/cf5u-bm9w/rows.csv";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Every field is optional in the file; missing ones take the default.
///
/// ```json
/// {
///   "data_url": "https://data.cdc.gov/api/views/cf5u-bm9w/rows.csv",
///   "local_path": "data.csv",
///   "cache_ttl_secs": 3600,
///   "default_states": ["COVID-NET", "California", "New York"],
///   "http_timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_url: String,
    pub local_path: PathBuf,
    pub cache_ttl_secs: u64,
    /// Chart these when no state is selected, if all are present.
    pub default_states: Vec<String>,
    /// `None` keeps the HTTP client's default 30 s request timeout.
    pub http_timeout_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            local_path: PathBuf::from("data.csv"),
            cache_ttl_secs: 3600,
            default_states: vec![
                "COVID-NET".to_string(),
                "California".to_string(),
                "New York".to_string(),
            ],
            http_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, defaults otherwise. A file that exists but
    /// does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
