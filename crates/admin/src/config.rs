//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `ADMIN_FORM_SECRET_CODE` - Code a new admin must know to create an account
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: `http://localhost:3001`)
//! - `ADMIN_TIMEZONE` - IANA zone for the dashboard greeting (default: `America/Chicago`)
//! - `ADMIN_AUTO_LOGIN` / `ADMIN_AUTO_LOGIN_USERNAME` - Development only: log the
//!   named admin in whenever the login page is requested
//! - `IMAGE_DIR` - Local image directory (default: `crates/site/static/images`)
//! - `AWS_PROJECT_BUCKET` - S3 bucket mirroring the image directory
//! - `AWS_PROJECT_BUCKET_IMAGE_DIR` - Key prefix inside the bucket (default: `images/`)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking
//!
//! AWS credentials and region are read by the S3 client itself
//! (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`).

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TIMEZONE: &str = "America/Chicago";
const DEFAULT_IMAGE_DIR: &str = "crates/site/static/images";
const DEFAULT_BUCKET_PREFIX: &str = "images/";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Code required on the create-admin form
    pub form_secret_code: SecretString,
    /// Username to log in automatically (development only)
    pub auto_login_username: Option<String>,
    /// Zone used for the dashboard greeting
    pub timezone: Tz,
    /// Image storage settings
    pub images: ImageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Where product images live.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Local directory served by the public site at `/static/images`
    pub dir: PathBuf,
    /// Optional S3 mirror
    pub bucket: Option<BucketConfig>,
}

/// S3 bucket mirroring the local image directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub name: String,
    /// Key prefix, always ending in `/`
    pub prefix: String,
}

impl ImageConfig {
    /// Load the image settings on their own (the CLI needs only these).
    #[must_use]
    pub fn from_env() -> Self {
        let dir = PathBuf::from(get_env_or_default("IMAGE_DIR", DEFAULT_IMAGE_DIR));
        let bucket = get_optional_env("AWS_PROJECT_BUCKET")
            .filter(|name| !name.trim().is_empty())
            .map(|name| BucketConfig {
                name,
                prefix: normalize_prefix(&get_env_or_default(
                    "AWS_PROJECT_BUCKET_IMAGE_DIR",
                    DEFAULT_BUCKET_PREFIX,
                )),
            });
        Self { dir, bucket }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");
        let session_secret = get_validated_secret("ADMIN_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;
        let form_secret_code = get_required_secret("ADMIN_FORM_SECRET_CODE")?;

        let auto_login_username = auto_login(
            get_optional_env("ADMIN_AUTO_LOGIN").as_deref(),
            get_optional_env("ADMIN_AUTO_LOGIN_USERNAME"),
        )?;
        if auto_login_username.is_some() {
            tracing::warn!("ADMIN_AUTO_LOGIN is enabled; do not use this in production");
        }

        let timezone = parse_timezone(&get_env_or_default("ADMIN_TIMEZONE", DEFAULT_TIMEZONE))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            form_secret_code,
            auto_login_username,
            timezone,
            images: ImageConfig::from_env(),
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Compare a submitted create-admin code against the configured one.
    #[must_use]
    pub fn form_secret_matches(&self, submitted: &str) -> bool {
        self.form_secret_code.expose_secret() == submitted
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Resolve the auto-login pair. A username is required once the flag is on.
fn auto_login(flag: Option<&str>, username: Option<String>) -> Result<Option<String>, ConfigError> {
    let enabled = flag.is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"));
    if !enabled {
        return Ok(None);
    }
    match username.filter(|u| !u.trim().is_empty()) {
        Some(name) => Ok(Some(name)),
        None => Err(ConfigError::MissingEnvVar(
            "ADMIN_AUTO_LOGIN_USERNAME".to_string(),
        )),
    }
}

fn parse_timezone(value: &str) -> Result<Tz, ConfigError> {
    value
        .parse::<Tz>()
        .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_TIMEZONE".to_string(), e.to_string()))
}

/// Bucket prefixes are stored without a leading slash and with a trailing one.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            form_secret_code: SecretString::from("walnut-and-oak"),
            auto_login_username: None,
            timezone: chrono_tz::America::Chicago,
            images: ImageConfig {
                dir: PathBuf::from(DEFAULT_IMAGE_DIR),
                bucket: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-session-key-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_form_secret_matches() {
        let config = test_config();
        assert!(config.form_secret_matches("walnut-and-oak"));
        assert!(!config.form_secret_matches("walnut"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let output = format!("{:?}", test_config());
        assert!(!output.contains("walnut-and-oak"));
        assert!(!output.contains(&"x".repeat(32)));
    }

    #[test]
    fn test_auto_login_requires_username() {
        assert_eq!(auto_login(None, Some("jmanning".into())).unwrap(), None);
        assert_eq!(auto_login(Some("false"), None).unwrap(), None);
        assert_eq!(
            auto_login(Some("TRUE"), Some("jmanning".into())).unwrap(),
            Some("jmanning".to_string())
        );
        assert!(auto_login(Some("true"), Some("  ".into())).is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(
            parse_timezone("America/Chicago").unwrap(),
            chrono_tz::America::Chicago
        );
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("images"), "images/");
        assert_eq!(normalize_prefix("/site/images/"), "site/images/");
        assert_eq!(normalize_prefix(""), "");
    }
}
