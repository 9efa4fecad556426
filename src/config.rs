//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::contact::limiter::{RateLimitConfig, SweepPolicy};
use crate::error::ConfigError;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds on all interfaces.
    pub port: u16,
    /// JSON knowledge file replacing the built-in chat topics.
    pub knowledge_path: Option<PathBuf>,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            knowledge_path: None,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup; unset variables keep their defaults.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_or(&get, "TRITON_PORT", defaults.port)?,
            knowledge_path: get("TRITON_KNOWLEDGE_PATH").map(PathBuf::from),
            rate_limit: rate_limit_from_vars(&get)?,
        })
    }
}

fn rate_limit_from_vars(get: &impl Fn(&str) -> Option<String>) -> Result<RateLimitConfig, ConfigError> {
    let max_submissions: usize = parse_or(get, "RATE_LIMIT_MAX_SUBMISSIONS", 3)?;
    if max_submissions == 0 {
        return Err(ConfigError::InvalidValue {
            key: "RATE_LIMIT_MAX_SUBMISSIONS".into(),
            message: "must be at least 1".into(),
        });
    }

    let window_secs: i64 = parse_or(get, "RATE_LIMIT_WINDOW_SECS", 3600)?;
    let window = TimeDelta::try_seconds(window_secs)
        .filter(|w| *w > TimeDelta::zero())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "RATE_LIMIT_WINDOW_SECS".into(),
            message: format!("out of range: {window_secs}"),
        })?;

    let sweep = match get("RATE_LIMIT_SWEEP").as_deref().map(str::trim) {
        None | Some("probabilistic") => {
            let probability: f64 = parse_or(get, "RATE_LIMIT_SWEEP_PROBABILITY", 0.01)?;
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigError::InvalidValue {
                    key: "RATE_LIMIT_SWEEP_PROBABILITY".into(),
                    message: format!("must be within 0..=1, got {probability}"),
                });
            }
            SweepPolicy::Probabilistic { probability }
        }
        Some("periodic") => {
            let secs: u64 = parse_or(get, "RATE_LIMIT_SWEEP_INTERVAL_SECS", 300)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "RATE_LIMIT_SWEEP_INTERVAL_SECS".into(),
                    message: "must be at least 1".into(),
                });
            }
            SweepPolicy::Periodic {
                interval: Duration::from_secs(secs),
            }
        }
        Some(other) => {
            return Err(ConfigError::InvalidValue {
                key: "RATE_LIMIT_SWEEP".into(),
                message: format!("unknown policy {other:?}, expected probabilistic or periodic"),
            });
        }
    };

    Ok(RateLimitConfig {
        max_submissions,
        window,
        sweep,
    })
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse {raw:?}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        ServerConfig::from_vars(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_match_contact_policy() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(cfg.knowledge_path.is_none());
        assert_eq!(cfg.rate_limit.max_submissions, 3);
        assert_eq!(cfg.rate_limit.window, TimeDelta::hours(1));
        assert_eq!(
            cfg.rate_limit.sweep,
            SweepPolicy::Probabilistic { probability: 0.01 }
        );
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = load(&[
            ("TRITON_PORT", "9000"),
            ("TRITON_KNOWLEDGE_PATH", "/etc/triton/kb.json"),
            ("RATE_LIMIT_MAX_SUBMISSIONS", "5"),
            ("RATE_LIMIT_WINDOW_SECS", "600"),
            ("RATE_LIMIT_SWEEP", "periodic"),
            ("RATE_LIMIT_SWEEP_INTERVAL_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.knowledge_path, Some(PathBuf::from("/etc/triton/kb.json")));
        assert_eq!(cfg.rate_limit.max_submissions, 5);
        assert_eq!(cfg.rate_limit.window, TimeDelta::minutes(10));
        assert_eq!(
            cfg.rate_limit.sweep,
            SweepPolicy::Periodic {
                interval: Duration::from_secs(30)
            }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        for pairs in [
            vec![("TRITON_PORT", "eighty")],
            vec![("RATE_LIMIT_MAX_SUBMISSIONS", "0")],
            vec![("RATE_LIMIT_WINDOW_SECS", "-5")],
            vec![("RATE_LIMIT_SWEEP_PROBABILITY", "1.5")],
            vec![("RATE_LIMIT_SWEEP", "hourly")],
            vec![("RATE_LIMIT_SWEEP", "periodic"), ("RATE_LIMIT_SWEEP_INTERVAL_SECS", "0")],
        ] {
            let err = load(&pairs).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { .. }),
                "pairs: {pairs:?}"
            );
        }
    }
}
