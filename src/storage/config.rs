//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/flickr-feed/config.toml`
//! - macOS: `~/Library/Application Support/com.flickr-feed.flickr-feed/config.toml`
//! - Windows: `%APPDATA%/flickr-feed/flickr-feed/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `FLICKR_FEED_BASE_URL`: API base URL
//! - `FLICKR_FEED_HTTP_DEBUG`: Log request/response bodies (1, true, yes)
//! - `FLICKR_FEED_FORMAT`: Output format (human, json, md)
//! - `FLICKR_FEED_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `FLICKR_FEED_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `FLICKR_FEED_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat, SearchArgs};
use crate::core::DEFAULT_BASE_URL;
use crate::core::client::StatusPolicy;
use crate::error::{AppError, Result};
use crate::util::env::{env_non_empty, is_env_truthy};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the API base URL.
pub const ENV_BASE_URL: &str = "FLICKR_FEED_BASE_URL";
/// Environment variable to enable wire logging.
pub const ENV_HTTP_DEBUG: &str = "FLICKR_FEED_HTTP_DEBUG";
/// Environment variable for output format.
pub const ENV_FORMAT: &str = "FLICKR_FEED_FORMAT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "FLICKR_FEED_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "FLICKR_FEED_PRETTY";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "FLICKR_FEED_CONFIG";

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// API base URL for relative endpoints.
    pub base_url: String,
    /// How HTTP statuses affect search outcomes.
    pub status_policy: StatusPolicy,
    /// Whether wire logging was requested.
    pub http_debug: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Whether to disable colored output.
    pub no_color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    /// Config file that was consulted.
    pub config_path: PathBuf,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub base_url: ConfigSource,
    pub status_policy: ConfigSource,
    pub http_debug: ConfigSource,
    pub format: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but is invalid
    /// - Any resolved value is invalid (e.g., a non-http base URL)
    pub fn resolve(cli: &Cli, search_args: Option<&SearchArgs>) -> Result<Self> {
        let config_path = config_path();
        let config = Config::load_from(&config_path)?;
        Self::from_parts(cli, search_args, &config, config_path)
    }

    /// Resolve against an already loaded config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or any resolved value is invalid.
    pub fn from_parts(
        cli: &Cli,
        search_args: Option<&SearchArgs>,
        config: &Config,
        config_path: PathBuf,
    ) -> Result<Self> {
        config.validate()?;

        let mut sources = ConfigSources::default();

        let base_url = Self::resolve_base_url(search_args, config, &mut sources.base_url)?;
        let status_policy =
            Self::resolve_status_policy(search_args, config, &mut sources.status_policy);
        let http_debug = Self::resolve_http_debug(cli, config, &mut sources.http_debug);
        let format = Self::resolve_format(cli, config, &mut sources.format)?;
        let no_color = Self::resolve_no_color(cli, config, &mut sources.no_color);
        let pretty = Self::resolve_pretty(cli, config, &mut sources.pretty);

        Ok(Self {
            base_url,
            status_policy,
            http_debug,
            format,
            no_color,
            pretty,
            config_path,
            sources,
        })
    }

    /// Resolve the API base URL.
    fn resolve_base_url(
        search_args: Option<&SearchArgs>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<String> {
        // 1. CLI --base-url flag
        if let Some(url) = search_args.and_then(|args| args.base_url.as_deref()) {
            *source = ConfigSource::Cli;
            validate_base_url(url)?;
            return Ok(url.to_string());
        }

        // 2. Environment variable
        if let Some(url) = env_non_empty(ENV_BASE_URL) {
            *source = ConfigSource::Env;
            validate_base_url(&url)?;
            return Ok(url);
        }

        // 3. Config file
        if let Some(url) = &config.api.base_url {
            *source = ConfigSource::ConfigFile;
            return Ok(url.clone());
        }

        // 4. Default
        *source = ConfigSource::Default;
        Ok(DEFAULT_BASE_URL.to_string())
    }

    /// Resolve the status policy.
    fn resolve_status_policy(
        search_args: Option<&SearchArgs>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> StatusPolicy {
        if search_args.is_some_and(|args| args.strict_status) {
            *source = ConfigSource::Cli;
            return StatusPolicy::RequireSuccess;
        }

        if config.api.strict_status {
            *source = ConfigSource::ConfigFile;
            return StatusPolicy::RequireSuccess;
        }

        *source = ConfigSource::Default;
        StatusPolicy::AcceptAny
    }

    /// Resolve the wire logging request.
    fn resolve_http_debug(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.http_debug {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_HTTP_DEBUG) {
            *source = ConfigSource::Env;
            return true;
        }

        if config.debug.http_bodies {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    /// Resolve output format setting.
    fn resolve_format(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        // 1. CLI --json or --format
        if let Some(format) = cli.effective_format() {
            *source = ConfigSource::Cli;
            return Ok(format);
        }

        // 2. Environment variable
        if let Some(format_env) = env_non_empty(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return parse_format("FLICKR_FEED_FORMAT", &format_env);
        }

        // 3. Config file
        if let Some(format_str) = &config.output.format {
            *source = ConfigSource::ConfigFile;
            return parse_format("output.format", format_str);
        }

        // 4. Default
        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    /// Resolve `no_color` setting.
    fn resolve_no_color(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        // 1. CLI --no-color flag
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }

        // 2. Environment variable (FLICKR_FEED_NO_COLOR or standard NO_COLOR)
        if is_env_truthy(ENV_NO_COLOR) || std::env::var_os(ENV_NO_COLOR_STD).is_some() {
            *source = ConfigSource::Env;
            return true;
        }

        // 3. Config file (inverted: config.output.color = false means no_color = true)
        if !config.output.color {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        // 4. Default
        *source = ConfigSource::Default;
        false
    }

    /// Resolve pretty setting.
    fn resolve_pretty(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_PRETTY) {
            *source = ConfigSource::Env;
            return true;
        }

        if config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }
}

/// Config file path, respecting the `FLICKR_FEED_CONFIG` override.
#[must_use]
pub fn config_path() -> PathBuf {
    env_non_empty(ENV_CONFIG).map_or_else(|| AppPaths::new().config_file(), PathBuf::from)
}

/// Check that a base URL is an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`AppError::ConfigInvalid`] naming `base_url`.
pub fn validate_base_url(value: &str) -> Result<()> {
    let invalid = |message: String| AppError::ConfigInvalid {
        key: "base_url".to_string(),
        value: value.to_string(),
        message,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn parse_format(key: &str, value: &str) -> Result<OutputFormat> {
    OutputFormat::from_arg(value).ok_or_else(|| AppError::ConfigInvalid {
        key: key.to_string(),
        value: value.to_string(),
        message: "valid formats: human, json, md".to_string(),
    })
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API settings.
    pub api: ApiConfig,
    /// Diagnostics.
    pub debug: DebugConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// API settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for relative endpoints (default `https://api.flickr.com`).
    pub base_url: Option<String>,
    /// Treat non-2xx statuses as failures.
    pub strict_status: bool,
}

/// Diagnostic settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log request and response bodies (debug builds only).
    pub http_bodies: bool,
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    /// Whether to use colors in output.
    pub color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - The base URL, if set, is an http(s) URL
    /// - Output format is valid (human, json, md)
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.base_url {
            validate_base_url(url)?;
        }

        if let Some(format) = &self.output.format {
            parse_format("output.format", format)?;
        }

        Ok(())
    }
}
