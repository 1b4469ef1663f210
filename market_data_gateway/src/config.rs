//! Gateway configuration.
//!
//! Settings come from an optional TOML file, with `MARKET_DATA_*` environment
//! variables layered on top. The upstream API key is never part of this struct;
//! providers read it from the environment themselves.
//!
//! ```toml
//! base_url = "https://api.polygon.io"
//! page_size = 50
//! history_years = 2
//! timeframe = "1D"
//! timeout_secs = 15
//! max_requests_per_minute = 5
//! ```

use std::{num::NonZeroU32, path::Path, time::Duration};

use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use shared_utils::env::{get_env_parse, get_env_var};

use crate::{errors::ConfigError, models::timeframe::Timeframe};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = nonzero!(50u32);
pub const DEFAULT_HISTORY_YEARS: u32 = 2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = nonzero!(5u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Upstream (or proxy) origin, without a trailing path.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: NonZeroU32,
    /// Calendar years of history, counted back from today.
    pub history_years: u32,
    /// Bar interval requested from upstream.
    pub timeframe: Timeframe,
    /// Transport timeout for a single request.
    pub timeout_secs: u64,
    /// Client-side request budget.
    pub max_requests_per_minute: NonZeroU32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            history_years: DEFAULT_HISTORY_YEARS,
            timeframe: Timeframe::DAILY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

impl GatewayConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise the defaults, then applies
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_toml_path(p)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Applies `MARKET_DATA_BASE_URL`, `MARKET_DATA_PAGE_SIZE`,
    /// `MARKET_DATA_HISTORY_YEARS` and `MARKET_DATA_TIMEOUT_SECS` when set.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = get_env_var("MARKET_DATA_BASE_URL") {
            self.base_url = url;
        }
        if let Some(size) = get_env_parse::<NonZeroU32>("MARKET_DATA_PAGE_SIZE")? {
            self.page_size = size;
        }
        if let Some(years) = get_env_parse::<u32>("MARKET_DATA_HISTORY_YEARS")? {
            self.history_years = years;
        }
        if let Some(secs) = get_env_parse::<u64>("MARKET_DATA_TIMEOUT_SECS")? {
            self.timeout_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if self.history_years == 0 {
            return Err(ConfigError::Invalid("history_years must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `base_url` without trailing slashes, ready for path concatenation.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::models::timeframe::TimeframeUnit;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = GatewayConfig::from_toml_str("page_size = 100\ntimeframe = \"4h\"").unwrap();
        assert_eq!(cfg.page_size.get(), 100);
        assert_eq!(cfg.timeframe.unit, TimeframeUnit::Hour);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.history_years, DEFAULT_HISTORY_YEARS);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_page_size() {
        assert!(matches!(
            GatewayConfig::from_toml_str("api_key = \"nope\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GatewayConfig::from_toml_str("page_size = 0"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GatewayConfig::from_toml_str("history_years = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    #[serial]
    fn loads_file_then_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:9000/\"").unwrap();

        // SAFETY: environment-mutating tests are serialized.
        unsafe { std::env::set_var("MARKET_DATA_PAGE_SIZE", "25") };
        let cfg = GatewayConfig::load(Some(file.path()));
        unsafe { std::env::remove_var("MARKET_DATA_PAGE_SIZE") };

        let cfg = cfg.unwrap();
        assert_eq!(cfg.origin(), "http://localhost:9000");
        assert_eq!(cfg.page_size.get(), 25);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GatewayConfig::from_toml_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
