//! Configuration constants, environment loading and validation.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveTime;
use regex::Regex;

use crate::error::{Result, WedofError};

/// Default base URL of the Wedof API.
pub const DEFAULT_BASE_URL: &str = "https://www.wedof.fr";

/// Number of items requested per page. Also the page size that marks a full page.
pub const PAGE_LIMIT: usize = 100;

/// Minimum spacing between two requests.
///
/// The API allows 100 requests per minute, so one request every 600 ms.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(600);

/// Remaining-quota value under which a warning is logged.
pub const LOW_QUOTA_THRESHOLD: u64 = 5;

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default daily sync time.
pub const DEFAULT_SYNC_TIME: &str = "09:00";

/// Default directory used by the directory sheet writer.
pub const DEFAULT_OUTPUT_DIR: &str = "wedof-export";

/// Sync time pattern: HH:MM.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SYNC_TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid regex"));

/// Validate and parse a daily sync time (HH:MM, 24h clock).
///
/// # Examples
/// ```
/// use wedof_sync::config::parse_sync_time;
///
/// assert!(parse_sync_time("09:00").is_ok());
/// assert!(parse_sync_time("9h").is_err());
/// assert!(parse_sync_time("24:00").is_err());
/// ```
pub fn parse_sync_time(value: &str) -> Result<NaiveTime> {
    if !SYNC_TIME_PATTERN.is_match(value) {
        return Err(WedofError::InvalidSyncTime(value.to_string()));
    }

    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| WedofError::InvalidSyncTime(value.to_string()))
}

/// Settings of the Wedof API client.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub min_request_interval: Duration,
    pub low_quota_threshold: u64,
    pub timeout_secs: u64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("min_request_interval", &self.min_request_interval)
            .field("low_quota_threshold", &self.low_quota_threshold)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            low_quota_threshold: LOW_QUOTA_THRESHOLD,
            timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("WEDOF_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| WedofError::Config("WEDOF_API_KEY not set".into()))?;

        let base_url = lookup("WEDOF_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let min_request_interval = lookup("WEDOF_MIN_REQUEST_INTERVAL_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MIN_REQUEST_INTERVAL);

        let timeout_secs = lookup("WEDOF_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            base_url,
            min_request_interval,
            low_quota_threshold: LOW_QUOTA_THRESHOLD,
            timeout_secs,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_low_quota_threshold(mut self, threshold: u64) -> Self {
        self.low_quota_threshold = threshold;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Settings of the sync service: the client plus scheduling and output.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub client: ClientConfig,
    pub sync_time: NaiveTime,
    pub output_dir: PathBuf,
}

/// Command-line values taking precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct SyncOverrides {
    pub sync_time: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(&SyncOverrides::default())
    }

    pub fn from_env_with(overrides: &SyncOverrides) -> Result<Self> {
        Self::from_lookup_with(|key| std::env::var(key).ok(), overrides)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_lookup_with(lookup, &SyncOverrides::default())
    }

    /// Load from `lookup`. An override replaces its variable before validation,
    /// so an invalid `SYNC_TIME` is ignored when `sync_time` is overridden.
    pub fn from_lookup_with(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: &SyncOverrides,
    ) -> Result<Self> {
        let client = ClientConfig::from_lookup(&lookup)?;

        let sync_time = match &overrides.sync_time {
            Some(at) => parse_sync_time(at)?,
            None => parse_sync_time(
                &lookup("SYNC_TIME").unwrap_or_else(|| DEFAULT_SYNC_TIME.into()),
            )?,
        };

        let output_dir = match &overrides.output_dir {
            Some(dir) => dir.clone(),
            None => lookup("WEDOF_OUTPUT_DIR")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into())
                .into(),
        };

        Ok(Self {
            client,
            sync_time,
            output_dir,
        })
    }
}
