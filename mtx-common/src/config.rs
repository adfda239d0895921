//! Configuration loading
//!
//! The allowlist of source formats, the target format and the encoder
//! parameters are carried in an explicit [`TransferConfig`] value rather than
//! module-level constants, so tests can substitute their own.
//!
//! # Config File Resolution
//!
//! 1. Command-line argument (`--config`, highest priority)
//! 2. Environment variable (`MTX_CONFIG`)
//! 3. `<config_dir>/music-transfer/config.toml`
//! 4. Built-in defaults (fallback)
//!
//! A file named explicitly (1 or 2) must exist and parse. The platform file (3)
//! is optional; when absent the built-in defaults are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "MTX_CONFIG";

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "music-transfer";

/// Transfer configuration loaded from TOML
///
/// Every field is optional in the file; missing fields take built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferConfig {
    /// Extensions accepted on the source side (without leading dot)
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Extension of the portable target format (without leading dot)
    #[serde(default = "default_target_extension")]
    pub target_extension: String,

    /// Parameters passed through to the external encoder
    #[serde(default)]
    pub encoder: EncoderSettings,

    /// Conversion worker count (default: CPU core count)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Encoder invocation parameters
///
/// Defaults produce LAME VBR quality 3 (150-195 kbit/s, ~175 kbit/s average).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncoderSettings {
    /// Encoder executable
    #[serde(default = "default_encoder_program")]
    pub program: PathBuf,

    /// Audio codec name understood by the encoder
    #[serde(default = "default_encoder_codec")]
    pub codec: String,

    /// VBR quality level
    #[serde(default = "default_encoder_quality")]
    pub quality: u8,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Where the effective configuration came from
///
/// Configuration is loaded before logging is set up, so callers report this
/// once their subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserConfigDir(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CommandLine(path) => write!(f, "{} (--config)", path.display()),
            ConfigSource::Environment(path) => {
                write!(f, "{} ({})", path.display(), CONFIG_ENV_VAR)
            }
            ConfigSource::UserConfigDir(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

fn default_source_extensions() -> Vec<String> {
    ["mp3", "flac", "m4a", "opus"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_target_extension() -> String {
    "mp3".to_string()
}

fn default_encoder_program() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_encoder_codec() -> String {
    "libmp3lame".to_string()
}

fn default_encoder_quality() -> u8 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            program: default_encoder_program(),
            codec: default_encoder_codec(),
            quality: default_encoder_quality(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            source_extensions: default_source_extensions(),
            target_extension: default_target_extension(),
            encoder: EncoderSettings::default(),
            workers: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Strip a leading dot and lowercase an extension for comparison
pub fn canonical_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

impl TransferConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: TransferConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.source_extensions = config
            .source_extensions
            .iter()
            .map(|ext| canonical_extension(ext))
            .collect();
        config.target_extension = canonical_extension(&config.target_extension);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file that must exist
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Resolve and load configuration following the documented priority order
    pub fn load(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = resolve_config_source(cli_arg);
        let config = match &source {
            ConfigSource::CommandLine(path)
            | ConfigSource::Environment(path)
            | ConfigSource::UserConfigDir(path) => Self::load_from_file(path)?,
            ConfigSource::Defaults => Self::default(),
        };
        Ok((config, source))
    }

    /// Check value constraints
    pub fn validate(&self) -> Result<()> {
        if self.source_extensions.is_empty()
            || self.source_extensions.iter().any(|ext| ext.is_empty())
        {
            return Err(Error::Config(
                "source_extensions must list at least one non-empty extension".to_string(),
            ));
        }
        if self.target_extension.is_empty() {
            return Err(Error::Config("target_extension must not be empty".to_string()));
        }
        if self.encoder.program.as_os_str().is_empty() {
            return Err(Error::Config("encoder.program must not be empty".to_string()));
        }
        if self.encoder.codec.is_empty() {
            return Err(Error::Config("encoder.codec must not be empty".to_string()));
        }
        if self.workers == Some(0) {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Effective conversion worker count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Determine which config file (if any) applies
pub fn resolve_config_source(cli_arg: Option<&Path>) -> ConfigSource {
    if let Some(path) = cli_arg {
        return ConfigSource::CommandLine(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    if let Some(path) = user_config_path() {
        if path.is_file() {
            return ConfigSource::UserConfigDir(path);
        }
    }

    ConfigSource::Defaults
}

/// Platform config file location (`~/.config/music-transfer/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}
