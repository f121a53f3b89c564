//! Service configuration loaded from environment variables.
//!
//! `from_lookup` takes the variable source as a function so tests never touch
//! the real process environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use catalogd_core::ProductId;

use crate::flags::{DEFAULT_FLAG_TIMEOUT, DEFAULT_SENTINEL_ID};
use crate::workers::ReloadWorkerConfig;

pub const ENV_PORT: &str = "PRODUCT_CATALOG_PORT";
pub const ENV_CATALOG_DIR: &str = "PRODUCT_CATALOG_DIR";
pub const ENV_RELOAD_INTERVAL: &str = "PRODUCT_CATALOG_RELOAD_INTERVAL";
pub const ENV_RELOAD_TIMEOUT_MS: &str = "PRODUCT_CATALOG_RELOAD_TIMEOUT_MS";
pub const ENV_FLAG_TIMEOUT_MS: &str = "PRODUCT_CATALOG_FLAG_TIMEOUT_MS";
pub const ENV_FAILURE_ID: &str = "PRODUCT_CATALOG_FAILURE_ID";
pub const ENV_FAILURE_FLAG: &str = "PRODUCT_CATALOG_FAILURE";

pub const DEFAULT_CATALOG_DIR: &str = "./products";
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub port: u16,
    pub catalog_dir: PathBuf,
    pub reload_interval: Duration,
    pub reload_timeout: Duration,
    pub flag_timeout: Duration,
    pub sentinel_id: ProductId,
    /// Initial value of the in-process failure flag.
    pub failure_flag_enabled: bool,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port_raw = non_empty(ENV_PORT).ok_or(ConfigError::Missing(ENV_PORT))?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| invalid(ENV_PORT, &port_raw))?;

        let catalog_dir = non_empty(ENV_CATALOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_DIR));

        let reload_interval = parse_reload_interval(non_empty(ENV_RELOAD_INTERVAL).as_deref());

        let reload_timeout = match non_empty(ENV_RELOAD_TIMEOUT_MS) {
            Some(raw) => parse_millis(ENV_RELOAD_TIMEOUT_MS, &raw)?,
            None => DEFAULT_RELOAD_TIMEOUT,
        };

        let flag_timeout = match non_empty(ENV_FLAG_TIMEOUT_MS) {
            Some(raw) => parse_millis(ENV_FLAG_TIMEOUT_MS, &raw)?,
            None => DEFAULT_FLAG_TIMEOUT,
        };

        let sentinel_id = non_empty(ENV_FAILURE_ID)
            .map(|v| ProductId::new(v.trim()))
            .unwrap_or_else(|| ProductId::from(DEFAULT_SENTINEL_ID));

        let failure_flag_enabled = match non_empty(ENV_FAILURE_FLAG) {
            Some(raw) => parse_bool(ENV_FAILURE_FLAG, &raw)?,
            None => false,
        };

        Ok(Self {
            port,
            catalog_dir,
            reload_interval,
            reload_timeout,
            flag_timeout,
            sentinel_id,
            failure_flag_enabled,
        })
    }

    pub fn reload_worker_config(&self) -> ReloadWorkerConfig {
        ReloadWorkerConfig::default()
            .with_interval(self.reload_interval)
            .with_load_timeout(self.reload_timeout)
    }
}

/// Parse a reload interval in whole seconds.
///
/// Missing, unparsable, zero or negative values all fall back to 10 seconds.
pub fn parse_reload_interval(raw: Option<&str>) -> Duration {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs.unsigned_abs()))
        .unwrap_or(DEFAULT_RELOAD_INTERVAL)
}

fn parse_millis(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(invalid(name, raw)),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, raw)),
    }
}

fn invalid(name: &'static str, raw: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: raw.to_string(),
    }
}
