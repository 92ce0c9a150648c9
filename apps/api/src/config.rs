use std::ops::RangeInclusive;

use anyhow::{ensure, Context, Result};

/// One hour up to ten years.
const SESSION_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=87_600;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_hours: i64,
    /// Marks the session cookie `Secure`. Enable behind HTTPS.
    pub cookie_secure: bool,
    /// Single origin allowed to make credentialed cross-origin calls.
    /// When unset the API answers CORS permissively without credentials.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl_hours: check_session_ttl(parse_env("SESSION_TTL_HOURS", 720)?)?,
            cookie_secure: parse_env("COOKIE_SECURE", false)?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
        })
    }

    #[cfg(test)]
    pub fn test_default() -> Self {
        Config {
            database_url: "postgres://localhost/tracker_test".to_string(),
            db_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            session_ttl_hours: 1,
            cookie_secure: false,
            cors_origin: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn check_session_ttl(hours: i64) -> Result<i64> {
    ensure!(
        SESSION_TTL_HOURS_RANGE.contains(&hours),
        "SESSION_TTL_HOURS must be between {} and {} (got {hours})",
        SESSION_TTL_HOURS_RANGE.start(),
        SESSION_TTL_HOURS_RANGE.end()
    );
    Ok(hours)
}
