#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{invalid_value, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub use settings::Settings;

pub const DEFAULT_ENDPOINT: &str = "http://www.timetree.org/index.php";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub cache_dir: Option<PathBuf>,
    pub print_http: bool,
    pub sleep_seconds: u64,
    pub header: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_dir: None,
            print_http: false,
            sleep_seconds: 0,
            header: false,
        }
    }
}

impl RetrieverConfig {
    /// Built-in defaults overlaid with a settings file.
    pub fn from_settings(settings: Settings) -> Self {
        let defaults = Self::default();
        Self {
            endpoint: settings.service.endpoint.unwrap_or(defaults.endpoint),
            timeout_seconds: settings
                .service
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            user_agent: settings.service.user_agent.unwrap_or(defaults.user_agent),
            cache_dir: settings.cache_dir,
            print_http: defaults.print_http,
            sleep_seconds: settings.batch.sleep_seconds.unwrap_or(defaults.sleep_seconds),
            header: settings.batch.header.unwrap_or(defaults.header),
        }
    }
}

impl Validate for RetrieverConfig {
    fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| {
            invalid_value("endpoint", &self.endpoint, format!("not a TimeTree query URL: {}", e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid_value(
                "endpoint",
                &self.endpoint,
                "the TimeTree service is only reachable over http or https",
            ));
        }
        // Taxon parameters are appended as the query string.
        if endpoint.query().is_some() {
            return Err(invalid_value(
                "endpoint",
                &self.endpoint,
                "give the page URL without a query; taxon_a and taxon_b are added per pair",
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(invalid_value(
                "timeout_seconds",
                self.timeout_seconds,
                "a zero timeout would fail every request",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(invalid_value(
                "user_agent",
                &self.user_agent,
                "requests must identify the client",
            ));
        }

        if let Some(dir) = &self.cache_dir {
            if dir.as_os_str().is_empty() {
                return Err(invalid_value("cache_dir", "", "cache directory name is empty"));
            }
            if dir.is_file() {
                return Err(invalid_value(
                    "cache_dir",
                    dir.display(),
                    "a file already exists where the response cache should go",
                ));
            }
        }
        Ok(())
    }
}

impl ConfigProvider for RetrieverConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    fn print_http(&self) -> bool {
        self.print_http
    }

    fn sleep(&self) -> Duration {
        Duration::from_secs(self.sleep_seconds)
    }

    fn header(&self) -> bool {
        self.header
    }
}
