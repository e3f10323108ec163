//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL of the site (default: `http://localhost:3000`)
//! - `IMAGE_DIR` - Directory holding uploaded product images
//!   (default: `crates/site/static/images`)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default location of product images, shared with the admin uploader.
pub const DEFAULT_IMAGE_DIR: &str = "crates/site/static/images";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Public site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL, used for absolute links
    pub base_url: Url,
    /// Directory served at `/static/images`
    pub image_dir: PathBuf,
    pub sentry: SentryConfig,
}

/// Sentry settings.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    /// e.g. "development", "production"
    pub environment: Option<String>,
    /// Error sample rate (0.0 to 1.0)
    pub sample_rate: f32,
    /// Traces sample rate (0.0 to 1.0)
    pub traces_sample_rate: f32,
}

impl SentryConfig {
    fn from_env() -> Self {
        Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_rate("SENTRY_SAMPLE_RATE"),
            traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE"),
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SITE_DATABASE_URL")?;
        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SITE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_PORT".to_string(), e.to_string()))?;
        let base_url = Url::parse(&get_env_or_default("SITE_BASE_URL", "http://localhost:3000"))
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_BASE_URL".to_string(), e.to_string()))?;
        let image_dir = PathBuf::from(get_env_or_default("IMAGE_DIR", DEFAULT_IMAGE_DIR));

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            image_dir,
            sentry: SentryConfig::from_env(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Sample rates default to 1.0 and are clamped into range.
fn parse_rate(key: &str) -> f32 {
    get_optional_env(key)
        .and_then(|s| s.parse::<f32>().ok())
        .map_or(1.0, |rate| rate.clamp(0.0, 1.0))
}
