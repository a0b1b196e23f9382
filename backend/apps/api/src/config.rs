//! Gateway Configuration
//!
//! Everything comes from the environment (after `.env` is loaded).

use std::net::SocketAddr;
use std::time::Duration;

use auth::AuthConfig;
use auth::application::config::DEFAULT_SESSION_COOKIE_NAME;
use axum::http::HeaderValue;
use platform::config::{ConfigError, env_bool, env_opt, env_parse};
use platform::crypto::from_base64;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Ten years
const MAX_SESSION_TTL_SECS: u64 = 315_360_000;
/// One week
const MAX_SESSION_CLEANUP_INTERVAL_SECS: u64 = 604_800;

/// Process-wide settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory stores
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub session_cleanup_interval: Duration,
    pub frontend_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let release = !cfg!(debug_assertions);

        let session_secret = match env_opt("SESSION_SECRET") {
            Some(encoded) => decode_session_secret(&encoded)?,
            None if release => return Err(ConfigError::Missing("SESSION_SECRET".to_string())),
            None => {
                tracing::warn!("SESSION_SECRET not set, using a random secret for this process");
                AuthConfig::with_random_secret().session_secret
            }
        };

        let auth = AuthConfig {
            session_cookie_name: env_opt("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            session_secret,
            session_ttl: bounded_secs(
                "SESSION_TTL_SECS",
                env_parse("SESSION_TTL_SECS", 3600u64)?,
                MAX_SESSION_TTL_SECS,
            )?,
            cookie_secure: env_bool("COOKIE_SECURE", release)?,
            ..AuthConfig::default()
        };

        Ok(Self {
            bind_addr: env_parse("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?,
            database_url: env_opt("DATABASE_URL"),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5u32)?,
            session_cleanup_interval: bounded_secs(
                "SESSION_CLEANUP_INTERVAL_SECS",
                env_parse("SESSION_CLEANUP_INTERVAL_SECS", 600u64)?,
                MAX_SESSION_CLEANUP_INTERVAL_SECS,
            )?,
            frontend_origins: parse_origins(
                &env_opt("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
            ),
            auth,
        })
    }
}

/// Decode a base64 session secret that must be exactly 32 bytes
fn decode_session_secret(encoded: &str) -> Result<[u8; 32], ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "SESSION_SECRET".to_string(),
        value: "[REDACTED]".to_string(),
        reason,
    };

    let bytes = from_base64(encoded.trim()).map_err(|e| invalid(e.to_string()))?;

    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| invalid(format!("expected 32 bytes, got {}", bytes.len())))
}

/// A duration in whole seconds within `1..=max`
fn bounded_secs(key: &str, secs: u64, max: u64) -> Result<Duration, ConfigError> {
    if secs == 0 || secs > max {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            value: secs.to_string(),
            reason: format!("must be between 1 and {max} seconds"),
        });
    }

    Ok(Duration::from_secs(secs))
}

/// Comma-separated origins; unparsable entries are skipped
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}
