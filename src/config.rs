use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use chrono::{TimeDelta, Utc};
use tracing::info;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub admin_email: String,
    /// Hex encoded SHA-256 of the admin password.
    pub admin_password_sha256: String,
    pub session_ttl: TimeDelta,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", 12)?;
        let session_ttl = TimeDelta::try_hours(ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AppError::Config(format!("SESSION_TTL_HOURS out of range: {ttl_hours}"))
            })?;

        let config = Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://branch_portal.db".to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            admin_email: required(&lookup, "ADMIN_EMAIL")?,
            admin_password_sha256: required(&lookup, "ADMIN_PASSWORD_SHA256")?,
            session_ttl,
        };

        if config.admin_password_sha256.len() != 64
            || !config.admin_password_sha256.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(AppError::Config(
                "ADMIN_PASSWORD_SHA256 must be a 64 character hex digest".to_string(),
            ));
        }

        Ok(config)
    }

    #[cfg(test)]
    pub fn test(admin_email: &str, admin_password: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: "test-secret".to_string(),
            admin_email: admin_email.to_string(),
            admin_password_sha256: crate::auth::sha256_hex(admin_password),
            session_ttl: TimeDelta::hours(1),
        }
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{key} is not set")))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {key} value: {e}"))),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
