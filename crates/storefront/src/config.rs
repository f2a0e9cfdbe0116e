//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `BASE_URL` - Public URL of the site (cookies are `Secure` when https)
//! - `SESSION_SECRET` - Signs admin session tokens (min 32 chars, high entropy)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `ADMIN_PASSWORD` - Admin login password; without it admin login reports
//!   "not configured"
//! - `RESTAURANT_WHATSAPP` - Number orders are sent to (default: 9876543210)
//! - `RESTAURANT_PHONE` - Number shown in customer emails (default: +91 9876543210)
//! - `RESTAURANT_EMAIL` - Inbox for bookings and contact messages
//!   (default: info@biharbhojan.com)
//! - `RESTAURANT_UTC_OFFSET` - Restaurant time zone, used for "today" when
//!   validating booking dates (default: +05:30)
//! - `FROM_EMAIL` - Sender address (default: onboarding@resend.dev)
//! - `RESEND_API_KEY` - Resend API key; without it emails are only logged
//! - `MENU_PATH` - Menu JSON file (default: data/menu.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use bihar_bhojan_core::validation::MIN_ADMIN_PASSWORD_LENGTH;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Indian Standard Time, in seconds east of UTC.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

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
    "default",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Admin session token signing secret
    pub session_secret: SecretString,
    /// Admin login password, if admin access is enabled
    pub admin_password: Option<SecretString>,
    /// Restaurant contact details
    pub restaurant: RestaurantConfig,
    /// Outbound email settings
    pub email: EmailConfig,
    /// Path of the menu JSON file
    pub menu_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (production, staging, ...)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Restaurant contact details used in order links and emails.
#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    /// WhatsApp number that receives orders, 10 digits or with `91` prefix
    pub whatsapp: String,
    /// Phone number printed in customer emails
    pub phone: String,
    /// Inbox for booking and contact notifications
    pub email: String,
    /// Restaurant local time zone
    pub utc_offset: FixedOffset,
}

/// Outbound email settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct EmailConfig {
    /// Sender address
    pub from: String,
    /// Resend API key; `None` means log emails instead of sending
    pub resend_api_key: Option<SecretString>,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("from", &self.from)
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
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

        let database_url = get_required_secret("DATABASE_URL")?;
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BASE_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BASE_URL".to_string(), e.to_string()))?;
        let session_secret = get_validated_secret("SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SESSION_SECRET")?;

        let admin_password = get_optional_env("ADMIN_PASSWORD").map(SecretString::from);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            admin_password,
            restaurant: RestaurantConfig::from_env()?,
            email: EmailConfig::from_env(),
            menu_path: PathBuf::from(get_env_or_default("MENU_PATH", "data/menu.json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether `ADMIN_PASSWORD` is set but shorter than the login form
    /// accepts, so no login attempt can ever reach the password check.
    #[must_use]
    pub fn admin_password_too_short(&self) -> bool {
        self.admin_password
            .as_ref()
            .is_some_and(is_too_short_for_login)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl RestaurantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let whatsapp = get_env_or_default("RESTAURANT_WHATSAPP", "9876543210");
        if whatsapp.is_empty() || !whatsapp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "RESTAURANT_WHATSAPP".to_string(),
                "must contain digits only".to_string(),
            ));
        }

        let offset = get_env_or_default("RESTAURANT_UTC_OFFSET", "+05:30");
        let utc_offset = offset.parse::<FixedOffset>().map_err(|_| {
            ConfigError::InvalidEnvVar(
                "RESTAURANT_UTC_OFFSET".to_string(),
                format!("expected +HH:MM, got {offset}"),
            )
        })?;

        Ok(Self {
            whatsapp,
            phone: get_env_or_default("RESTAURANT_PHONE", "+91 9876543210"),
            email: get_env_or_default("RESTAURANT_EMAIL", "info@biharbhojan.com"),
            utc_offset,
        })
    }
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            whatsapp: "9876543210".to_string(),
            phone: "+91 9876543210".to_string(),
            email: "info@biharbhojan.com".to_string(),
            utc_offset: ist(),
        }
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            from: get_env_or_default("FROM_EMAIL", "onboarding@resend.dev"),
            resend_api_key: get_optional_env("RESEND_API_KEY").map(SecretString::from),
        }
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    match raw.parse::<f32>() {
        Ok(rate) if (0.0..=1.0).contains(&rate) => Ok(rate),
        _ => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a number between 0 and 1, got {raw}"),
        )),
    }
}

fn is_too_short_for_login(password: &SecretString) -> bool {
    password.expose_secret().chars().count() < MIN_ADMIN_PASSWORD_LENGTH
}

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
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
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
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
