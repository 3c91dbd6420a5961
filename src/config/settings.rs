//! Application settings loaded from environment variables.

use std::env;
use std::fmt;

use thiserror::Error;

use super::constants::{
    DEFAULT_AWS_REGION, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_JWT_SECRET,
    JWT_EXPIRATION_HOURS_RANGE, MIN_JWT_SECRET_LENGTH,
};

/// Runtime mode. Development exposes error detail in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; anything other than a development alias is production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Startup configuration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set in production")]
    Missing(&'static str),

    #[error("JWT_SECRET must be at least {0} characters long")]
    WeakSecret(usize),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub aws_region: String,
    pub s3_bucket: String,
    pub max_upload_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("aws_region", &self.aws_region)
            .field("s3_bucket", &self.s3_bucket)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Outside development, `JWT_SECRET` and `S3_BUCKET_NAME` are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if environment.is_development() => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret(MIN_JWT_SECRET_LENGTH));
        }

        let s3_bucket = match lookup("S3_BUCKET_NAME") {
            Some(bucket) => bucket,
            None if environment.is_development() => "toolshare-dev".to_string(),
            None => return Err(ConfigError::Missing("S3_BUCKET_NAME")),
        };

        let jwt_expiration_hours =
            parse_or(&lookup, "JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS)?;
        if !JWT_EXPIRATION_HOURS_RANGE.contains(&jwt_expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: jwt_expiration_hours.to_string(),
            });
        }

        Ok(Self {
            environment,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            s3_bucket,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
