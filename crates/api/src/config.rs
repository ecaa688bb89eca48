//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROSTER_DATABASE_URL` - `PostgreSQL` connection string
//! - `ADMIN_TOKEN_SECRET` - Session token signing secret for admin members
//!   (min 32 chars, high entropy)
//! - `MEMBER_TOKEN_SECRET` - Session token signing secret for worker members
//!   (min 32 chars, high entropy, must differ from the admin secret)
//!
//! ## Optional
//! - `ROSTER_HOST` - Bind address (default: 127.0.0.1)
//! - `ROSTER_PORT` - Listen port (default: 4000)
//! - `ROSTER_UPLOAD_DIR` - Avatar upload directory (default: uploads)
//! - `ROSTER_ALLOWED_ORIGIN` - CORS origin allowed to send session cookies

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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
///
/// Any of these is fatal at process startup; signing-key problems are never
/// surfaced per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("ADMIN_TOKEN_SECRET and MEMBER_TOKEN_SECRET must be distinct")]
    IdenticalSigningKeys,
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing keys, one per role domain
    pub signing_keys: SigningKeySet,
    /// Directory where uploaded avatar images are stored
    pub upload_dir: PathBuf,
    /// Origin allowed to make credentialed cross-site requests
    pub allowed_origin: Option<String>,
}

/// The two token signing secrets, one per role domain.
///
/// Loaded once at startup and immutable thereafter. A token signed with the
/// admin key verifies only under the admin key, and symmetrically for the
/// worker key, so compromise of one key does not yield forgeable tokens for
/// the other role.
///
/// Implements `Debug` manually to redact both keys.
#[derive(Clone)]
pub struct SigningKeySet {
    /// Signing secret for admin-role tokens
    pub admin: SecretString,
    /// Signing secret for worker-role tokens (the default domain)
    pub worker: SecretString,
}

impl std::fmt::Debug for SigningKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeySet")
            .field("admin", &"[REDACTED]")
            .field("worker", &"[REDACTED]")
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if either signing secret fails validation (placeholder detection,
    /// entropy check, key distinctness).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ROSTER_DATABASE_URL")?;
        let host = get_env_or_default("ROSTER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROSTER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ROSTER_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROSTER_PORT".to_string(), e.to_string()))?;

        let signing_keys = SigningKeySet::from_env()?;

        let upload_dir = PathBuf::from(get_env_or_default("ROSTER_UPLOAD_DIR", "uploads"));
        let allowed_origin = get_optional_env("ROSTER_ALLOWED_ORIGIN");

        Ok(Self {
            database_url,
            host,
            port,
            signing_keys,
            upload_dir,
            allowed_origin,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SigningKeySet {
    /// Build a key set from two secrets, enforcing that they differ.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::IdenticalSigningKeys` if both secrets are equal,
    /// which would collapse the two signing domains into one.
    pub fn new(admin: SecretString, worker: SecretString) -> Result<Self, ConfigError> {
        if admin.expose_secret() == worker.expose_secret() {
            return Err(ConfigError::IdenticalSigningKeys);
        }
        Ok(Self { admin, worker })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let admin = get_validated_secret("ADMIN_TOKEN_SECRET")?;
        validate_token_secret(&admin, "ADMIN_TOKEN_SECRET")?;

        let worker = get_validated_secret("MEMBER_TOKEN_SECRET")?;
        validate_token_secret(&worker, "MEMBER_TOKEN_SECRET")?;

        Self::new(admin, worker)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
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

/// Validate that a token secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
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

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
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
