//! Application configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The two backend base addresses are deployment concerns, not core behavior,
//! so they only ever enter the program through here.

use std::sync::OnceLock;
use url::Url;

/// Global configuration instance.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the catalog (metadata) service API.
    pub catalog_api_base: String,
    /// Base address of the stream (blob storage) service API.
    pub stream_api_base: String,
    /// Upload size cap in megabytes; 0 disables the cap.
    pub upload_max_mb: u64,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json or pretty).
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable colored output.
    Pretty,
    /// JSON structured logging for production.
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if a numeric variable fails to parse.
    pub fn from_env() -> Self {
        let catalog_api_base = std::env::var("CATALOG_API_BASE")
            .unwrap_or_else(|_| "http://localhost:7071/api".to_string());

        let stream_api_base = std::env::var("STREAM_API_BASE")
            .unwrap_or_else(|_| "http://localhost:7072/api".to_string());

        let upload_max_mb = std::env::var("UPLOAD_MAX_MB")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<u64>()
            .expect("UPLOAD_MAX_MB must be a valid integer");

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            catalog_api_base,
            stream_api_base,
            upload_max_mb,
            log_level,
            log_format,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns an error if either base address is not an http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, value) in [
            ("CATALOG_API_BASE", &self.catalog_api_base),
            ("STREAM_API_BASE", &self.stream_api_base),
        ] {
            let url = Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
                var,
                value: value.clone(),
                source,
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::UnsupportedScheme {
                    var,
                    scheme: url.scheme().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Catalog service base, without a trailing slash.
    pub fn catalog_base(&self) -> &str {
        self.catalog_api_base.trim_end_matches('/')
    }

    /// Stream service base, without a trailing slash.
    pub fn stream_base(&self) -> &str {
        self.stream_api_base.trim_end_matches('/')
    }

    /// Upload size cap in bytes, `None` when disabled.
    pub fn max_upload_bytes(&self) -> Option<u64> {
        (self.upload_max_mb > 0).then(|| self.upload_max_mb * 1024 * 1024)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL ({value}): {source}")]
    InvalidBaseUrl {
        var: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[error("{var} must use http or https, got {scheme}")]
    UnsupportedScheme { var: &'static str, scheme: String },
}

/// Initialize the global configuration.
///
/// Should be called once at application startup.
pub fn init() -> &'static Config {
    CONFIG.get_or_init(|| {
        dotenvy::dotenv().ok();
        Config::from_env()
    })
}

/// Get the global configuration.
///
/// # Panics
/// Panics if configuration has not been initialized.
pub fn get() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration not initialized. Call config::init() first.")
}
