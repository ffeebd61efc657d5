use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::notifications::feed::DEFAULT_INBOX_CAPACITY;
use crate::notifications::policy::ReconnectPolicy;
use crate::search::engine::{SearchEngine, DEFAULT_PREVIEW_LEN};
use crate::search::strategy::{BonusRules, ScoringStrategy};

/// Prefix of environment overrides, e.g. `TRELLIS_SEARCH__DEBOUNCE_MS=500`.
pub const ENV_PREFIX: &str = "TRELLIS";

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "trellis.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub preview_len: usize,
    pub strategy: ScoringStrategy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            preview_len: DEFAULT_PREVIEW_LEN,
            strategy: ScoringStrategy::default(),
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn engine(&self) -> SearchEngine {
        SearchEngine::new(self.strategy.clone(), self.preview_len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    pub limit: usize,
    pub rules: BonusRules,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            limit: crate::search::discovery::DEFAULT_RECOMMENDATIONS,
            rules: BonusRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Entries kept in the staff notification inbox.
    pub inbox_capacity: usize,
    pub reconnect: ReconnectPolicy,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NoticeSettings {
    /// Where dismissed notice ids are kept. In memory when unset.
    pub dismissal_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    /// Seconds between snapshot refreshes; 0 disables periodic refresh.
    pub refresh_interval_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            refresh_interval_secs: 300,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Root of the portal REST API serving the collections.
    pub api_base_url: String,
    pub search: SearchSettings,
    pub discovery: DiscoverySettings,
    pub notifications: NotificationSettings,
    pub notices: NoticeSettings,
    pub server: ServerSettings,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            search: SearchSettings::default(),
            discovery: DiscoverySettings::default(),
            notifications: NotificationSettings::default(),
            notices: NoticeSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl PortalConfig {
    /// Load configuration: built-in defaults, then the config file, then
    /// `TRELLIS_*` environment variables.
    ///
    /// With `path = None` the file is `$TRELLIS_CONFIG` or `trellis.toml`, and
    /// a missing file is not an error. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (
                std::env::var_os("TRELLIS_CONFIG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                false,
            ),
        };

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(file.as_path()).required(required))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: PortalConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", file.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        url::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::Config(format!("api_base_url '{}' is invalid: {}", self.api_base_url, e))
        })?;
        if self.search.preview_len == 0 {
            return Err(AppError::Config("search.preview_len must be positive".into()));
        }
        self.search.strategy.validate()?;
        self.discovery.rules.validate()?;
        if self.notifications.inbox_capacity == 0 {
            return Err(AppError::Config(
                "notifications.inbox_capacity must be positive".into(),
            ));
        }
        self.notifications.reconnect.validate()?;
        Ok(())
    }
}
