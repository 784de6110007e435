//! Configuration types and loading.
//!
//! The main entry point is [`MarginaliaConfig`], which represents the contents
//! of `marginalia.yaml`. Configuration is loaded with [`load_config`] and saved
//! with [`save_config`].

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "marginalia.yaml";

/// Prefix of environment variables overriding file values. Nested keys use
/// `__`, e.g. `MARGINALIA_EMAIL__ENABLED=true`.
pub const ENV_PREFIX: &str = "MARGINALIA_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Merging the file and environment layers failed.
    #[error("failed to load configuration: {0}")]
    LoadError(#[from] Box<figment::Error>),

    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    WriteError(#[from] std::io::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::LoadError(Box::new(e))
    }
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Notification e-mail section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Send notifications about new comments.
    #[serde(default)]
    pub enabled: bool,

    /// Domain used for the sender address (`noreply@<domain>`).
    #[serde(default = "default_email_domain")]
    pub domain: String,

    /// An address receiving a copy of every notification.
    #[serde(default)]
    pub mailing_list: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            domain: default_email_domain(),
            mailing_list: None,
        }
    }
}

impl EmailConfig {
    /// The sender address for notification mail.
    pub fn sender(&self) -> String {
        format!("noreply@{}", self.domain)
    }
}

fn default_email_domain() -> String {
    "localhost".to_string()
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "marginalia=info".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full marginalia configuration.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// will be deserialized correctly with sensible default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginaliaConfig {
    /// Path of the SQLite database.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Page size of the recent feed when the caller gives none.
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Resolve a reply-to-a-reply to the thread root when adding comments.
    #[serde(default)]
    pub flatten_replies_on_add: bool,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for MarginaliaConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_limit: default_limit(),
            flatten_replies_on_add: false,
            email: EmailConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from("marginalia.db")
}

fn default_limit() -> i64 {
    100
}

impl MarginaliaConfig {
    fn validate(self) -> Result<Self> {
        if self.default_limit <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_limit".into(),
                reason: format!("must be positive (got {})", self.default_limit),
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Builds the layered provider: defaults, then the YAML file at `path` (if
/// it exists), then `MARGINALIA_*` environment variables.
pub fn figment(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(MarginaliaConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extracts and validates a configuration from a prepared provider.
pub fn extract(figment: &Figment) -> Result<MarginaliaConfig> {
    let config: MarginaliaConfig = figment.extract()?;
    config.validate()
}

/// Loads configuration from `path` layered under the environment.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::LoadError`] if the file is not valid YAML or a value
/// has the wrong type, and [`ConfigError::InvalidValue`] for out-of-range
/// values.
pub fn load_config(path: &Path) -> Result<MarginaliaConfig> {
    extract(&figment(path))
}

/// Saves configuration to `path` as YAML, creating parent directories.
pub fn save_config(path: &Path, config: &MarginaliaConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
