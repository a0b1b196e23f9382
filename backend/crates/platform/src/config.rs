//! Environment Configuration Helpers
//!
//! Small typed readers over `std::env`. Loading `.env` is the binary's job.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("{0} must be set in environment")]
    Missing(String),

    /// Variable is set but does not parse
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read an optional variable; empty values count as unset
pub fn env_opt(key: &str) -> Option<String> {
    non_empty(env::var(key).ok())
}

/// Read and parse a variable, falling back to `default` when unset
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, env_opt(key), default)
}

/// Read a boolean flag (`1/0`, `true/false`, `yes/no`, `on/off`)
pub fn env_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    parse_bool(key, env_opt(key), default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
                value,
            }),
        },
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_default() {
        let v: u64 = parse_value("SESSION_TTL_SECS", None, 3600).unwrap();
        assert_eq!(v, 3600);
    }

    #[test]
    fn test_parse_value_set() {
        let v: u64 = parse_value("SESSION_TTL_SECS", Some(" 60 ".to_string()), 3600).unwrap();
        assert_eq!(v, 60);
    }

    #[test]
    fn test_parse_value_invalid() {
        let err = parse_value::<u64>("SESSION_TTL_SECS", Some("soon".to_string()), 1).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "SESSION_TTL_SECS"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", Some("TRUE".to_string()), false).unwrap());
        assert!(!parse_bool("X", Some("off".to_string()), true).unwrap());
        assert!(parse_bool("X", None, true).unwrap());
        assert!(parse_bool("X", Some("maybe".to_string()), true).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_missing_message() {
        let err = ConfigError::Missing("SESSION_SECRET".to_string());
        assert_eq!(err.to_string(), "SESSION_SECRET must be set in environment");
    }
}
