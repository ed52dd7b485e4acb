//! Configuration types for Jobfeed components.
//!
//! Defaults are compiled in and can be overridden by an optional TOML file
//! (see [`default_config_path`]). Every key in the file is optional:
//!
//! ```toml
//! [http]
//! base_url = "https://api.hh.ru/vacancies"
//! timeout_secs = 30
//! max_retries = 3
//! retry_base_delay_ms = 500
//! per_page = 50
//! concurrency = 4
//!
//! [storage]
//! data_dir = "data"
//! file_name = "vacancies.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;

/// HeadHunter vacancy search endpoint.
pub const DEFAULT_API_URL: &str = "https://api.hh.ru/vacancies";

/// Largest page size the search endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Upper bound on request attempts per page.
pub const MAX_RETRIES: u32 = 10;

/// Default store file name under the data directory.
pub const DEFAULT_STORE_FILE: &str = "vacancies.json";

/// HTTP client configuration for the listing service.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    /// Listings requested per page.
    pub per_page: u32,
    /// Pages fetched in parallel.
    pub concurrency: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            per_page: 50,
            concurrency: 4,
        }
    }
}

/// Location of the vacancy store.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: DEFAULT_STORE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    http: HttpSection,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
struct HttpSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    per_page: Option<u32>,
    concurrency: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    data_dir: Option<PathBuf>,
    file_name: Option<String>,
}

/// Returns `<config_dir>/jobfeed/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jobfeed").join("config.toml"))
}

/// Loads configuration from `path`, or from [`default_config_path`].
///
/// A missing file at the default location yields the defaults. A missing
/// file at an explicitly given path is an error.
///
/// # Errors
///
/// Returns `AppError::ConfigError` if the file cannot be read or parsed, or
/// if a value is out of range.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(AppConfig::default()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(e) => {
            return Err(AppError::ConfigError(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };

    debug!("Loading config from {}", path.display());
    parse_config(&contents)
}

/// Parses TOML configuration text on top of the defaults.
pub fn parse_config(contents: &str) -> Result<AppConfig, AppError> {
    let file: FileConfig =
        toml::from_str(contents).map_err(|e| AppError::ConfigError(e.to_string()))?;

    let mut config = AppConfig::default();
    let http = &mut config.http;
    if let Some(base_url) = file.http.base_url {
        http.base_url = base_url;
    }
    if let Some(secs) = file.http.timeout_secs {
        http.timeout = Duration::from_secs(secs);
    }
    if let Some(retries) = file.http.max_retries {
        if retries == 0 || retries > MAX_RETRIES {
            return Err(AppError::ConfigError(format!(
                "http.max_retries must be between 1 and {}, got {}",
                MAX_RETRIES, retries
            )));
        }
        http.max_retries = retries;
    }
    if let Some(ms) = file.http.retry_base_delay_ms {
        http.retry_base_delay = Duration::from_millis(ms);
    }
    if let Some(per_page) = file.http.per_page {
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(AppError::ConfigError(format!(
                "http.per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, per_page
            )));
        }
        http.per_page = per_page;
    }
    if let Some(concurrency) = file.http.concurrency {
        if concurrency == 0 {
            return Err(AppError::ConfigError(
                "http.concurrency must be at least 1".to_string(),
            ));
        }
        http.concurrency = concurrency;
    }

    if let Some(dir) = file.storage.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(name) = file.storage.file_name {
        config.storage.file_name = name;
    }

    Ok(config)
}
