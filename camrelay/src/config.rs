//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `CAMRELAY_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `CAMRELAY_` override YAML values
//! 3. **TELEGRAM_BOT_TOKEN** - Special case: overrides `telegram.bot_token` if set
//! 4. **PORT** - Special case: overrides `port` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `CAMRELAY_TELEGRAM__REQUEST_TIMEOUT=10s` sets the `telegram.request_timeout` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! PORT=8080
//!
//! # Set the bot token (preferred method, keeps the secret out of the config file)
//! TELEGRAM_BOT_TOKEN="123456:ABC-DEF1234"
//!
//! # Override nested values
//! CAMRELAY_STORAGE__TEMP_DIR=/var/tmp/camrelay
//! CAMRELAY_TELEGRAM__REQUEST_TIMEOUT=10s
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "CAMRELAY_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation; only the
/// Telegram bot token has no usable default and must be supplied.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Telegram Bot API configuration for the outbound photo delivery
    pub telegram: TelegramConfig,
    /// Scratch storage for per-request temporary image files
    pub storage: StorageConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            telegram: TelegramConfig::default(),
            storage: StorageConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token used to authenticate against the Bot API (secret, required).
    /// Prefer setting this via the TELEGRAM_BOT_TOKEN environment variable.
    pub bot_token: String,
    /// Base URL of the Bot API
    pub api_base: Url,
    /// Timeout applied to each outbound Bot API request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: Url::parse("https://api.telegram.org").expect("static URL"),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Scratch storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory where per-request image files are written before delivery.
    /// Created on startup if it doesn't exist.
    pub temp_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("temp_images"),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials (cookies) in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            // The capture page may be hosted anywhere (or opened from a file),
            // so all origins are allowed by default.
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600), // Cache preflight for 1 hour
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram.bot_token.is_empty() {
            anyhow::bail!(
                "Config validation: telegram.bot_token is not configured. \
                 Please set the TELEGRAM_BOT_TOKEN environment variable or add telegram.bot_token to the config file."
            );
        }

        if self.telegram.request_timeout.is_zero() {
            anyhow::bail!("Config validation: telegram.request_timeout must be greater than zero");
        }

        // Validate CORS configuration
        if self.cors.allowed_origins.is_empty() {
            anyhow::bail!("Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.");
        }

        // Validate that wildcard is not used with credentials
        let has_wildcard = self.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.cors.allow_credentials {
            anyhow::bail!("Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins.");
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("CAMRELAY_").split("__"))
            // Common TELEGRAM_BOT_TOKEN and PORT patterns
            .merge(
                Env::raw()
                    .only(&["TELEGRAM_BOT_TOKEN"])
                    .map(|_| "telegram.bot_token".into())
                    .split("."),
            )
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
