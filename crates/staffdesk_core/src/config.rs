//! Remote document-store configuration.
//!
//! # Responsibility
//! - Describe where the portal document lives and how to authenticate.
//! - Load settings from process environment for binaries.
//!
//! # Invariants
//! - `bin_id` and `master_key` are never empty after construction.
//! - `base_url` never ends with `/`.
//! - `Debug` output never contains the master key.

use std::env;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::time::Duration;

/// Default JSONBin-compatible API root.
pub const DEFAULT_API_BASE: &str = "https://api.jsonbin.io/v3";

pub const ENV_BIN_ID: &str = "STAFFDESK_BIN_ID";
pub const ENV_MASTER_KEY: &str = "STAFFDESK_MASTER_KEY";
pub const ENV_API_BASE: &str = "STAFFDESK_API_BASE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "STAFFDESK_HTTP_TIMEOUT_SECS";

/// Configuration error for missing or malformed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required setting is absent or blank.
    Missing(&'static str),
    /// Setting is present but unusable.
    Invalid { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, reason } => write!(f, "invalid setting `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Location and credentials of the single portal document.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    base_url: String,
    bin_id: String,
    master_key: String,
    timeout: Option<Duration>,
}

impl RemoteStoreConfig {
    /// Builds a config against [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    /// - `Missing` when `bin_id` or `master_key` is blank.
    pub fn new(bin_id: &str, master_key: &str) -> Result<Self, ConfigError> {
        let bin_id = bin_id.trim();
        if bin_id.is_empty() {
            return Err(ConfigError::Missing(ENV_BIN_ID));
        }
        let master_key = master_key.trim();
        if master_key.is_empty() {
            return Err(ConfigError::Missing(ENV_MASTER_KEY));
        }
        Ok(Self {
            base_url: DEFAULT_API_BASE.to_string(),
            bin_id: bin_id.to_string(),
            master_key: master_key.to_string(),
            timeout: None,
        })
    }

    /// Overrides the API root (for self-hosted or test endpoints).
    ///
    /// # Errors
    /// - `Invalid` when `base_url` is not an http(s) URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Sets an explicit request timeout; `None` keeps the client default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads configuration from `STAFFDESK_*` environment variables.
    ///
    /// # Errors
    /// - `Missing` when bin id or master key is unset.
    /// - `Invalid` when base URL or timeout cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bin_id = env::var(ENV_BIN_ID).map_err(|_| ConfigError::Missing(ENV_BIN_ID))?;
        let master_key =
            env::var(ENV_MASTER_KEY).map_err(|_| ConfigError::Missing(ENV_MASTER_KEY))?;
        let mut config = Self::new(&bin_id, &master_key)?;

        if let Ok(base_url) = env::var(ENV_API_BASE) {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(&base_url)?;
            }
        }
        if let Ok(raw) = env::var(ENV_HTTP_TIMEOUT_SECS) {
            config.timeout = parse_timeout_secs(&raw)?;
        }
        Ok(config)
    }

    /// Full URL of the portal document.
    pub fn document_url(&self) -> String {
        format!("{}/b/{}", self.base_url, self.bin_id)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bin_id(&self) -> &str {
        &self.bin_id
    }

    pub fn master_key(&self) -> &str {
        &self.master_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Debug for RemoteStoreConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStoreConfig")
            .field("base_url", &self.base_url)
            .field("bin_id", &self.bin_id)
            .field("master_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: ENV_API_BASE,
            reason: format!("expected http(s) URL, got `{trimmed}`"),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout_secs(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(err) => Err(ConfigError::Invalid {
            key: ENV_HTTP_TIMEOUT_SECS,
            reason: err.to_string(),
        }),
    }
}
