use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{QuotaPolicy, TriggerMode, TriggerPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub quota: QuotaSettings,
    #[serde(default)]
    pub engagement: EngagementSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Profile dataset, `.json` or `.toml`
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

fn default_catalog_path() -> String { "data/profiles.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSettings {
    #[serde(default = "default_free_requests_limit")]
    pub free_requests_limit: u32,
    #[serde(default = "default_paid_match_fee_cents")]
    pub paid_match_fee_cents: u32,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            free_requests_limit: default_free_requests_limit(),
            paid_match_fee_cents: default_paid_match_fee_cents(),
        }
    }
}

impl From<&QuotaSettings> for QuotaPolicy {
    fn from(settings: &QuotaSettings) -> Self {
        QuotaPolicy {
            free_requests_limit: settings.free_requests_limit,
            paid_match_fee_cents: settings.paid_match_fee_cents,
        }
    }
}

fn default_free_requests_limit() -> u32 { 3 }
fn default_paid_match_fee_cents() -> u32 { 500 }

#[derive(Debug, Clone, Deserialize)]
pub struct EngagementSettings {
    #[serde(default)]
    pub mode: TriggerMode,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for EngagementSettings {
    fn default() -> Self {
        Self {
            mode: TriggerMode::default(),
            threshold: default_threshold(),
        }
    }
}

impl From<&EngagementSettings> for TriggerPolicy {
    fn from(settings: &EngagementSettings) -> Self {
        TriggerPolicy {
            mode: settings.mode,
            threshold: settings.threshold,
        }
    }
}

fn default_threshold() -> f64 { 0.8 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_max_sessions() -> u64 { 10_000 }
fn default_idle_timeout_secs() -> u64 { 1800 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RMATCH__QUOTA__FREE_REQUESTS_LIMIT -> quota.free_requests_limit
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Reject values the matching core cannot work with
    fn validated(self) -> Result<Self, ConfigError> {
        if self.quota.free_requests_limit == 0 {
            return Err(ConfigError::Message(
                "quota.free_requests_limit must be positive".to_string(),
            ));
        }

        if !self.engagement.threshold.is_finite() || self.engagement.threshold < 0.0 {
            return Err(ConfigError::Message(
                "engagement.threshold must be a non-negative number".to_string(),
            ));
        }

        if self.engagement.mode == TriggerMode::Fraction && self.engagement.threshold > 1.0 {
            return Err(ConfigError::Message(
                "engagement.threshold must be within 0..=1 in fraction mode".to_string(),
            ));
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Message(
                "sessions.max_sessions must be positive".to_string(),
            ));
        }

        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
