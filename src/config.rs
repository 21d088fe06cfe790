//! Configuration types.

use chrono::Duration;
use secrecy::SecretString;

use crate::error::ConfigError;

/// Default gap between two outbound messages that turns a follow-up into a nudge.
pub const DEFAULT_NUDGE_THRESHOLD_HOURS: i64 = 72;

/// Default window within which an unanswered thread is still worth nudging.
pub const DEFAULT_RECENCY_WINDOW_DAYS: i64 = 90;

/// Thresholds used by the classifier and the worklist filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadingConfig {
    /// Minimum idle gap between two consecutive outbound messages for the
    /// later one to count as a nudge.
    pub nudge_threshold: Duration,
    /// How far back the last outbound message may lie and still be nudgeable.
    pub recency_window: Duration,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            nudge_threshold: Duration::hours(DEFAULT_NUDGE_THRESHOLD_HOURS), // 3 days
            recency_window: Duration::days(DEFAULT_RECENCY_WINDOW_DAYS),
        }
    }
}

impl ThreadingConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything unset, unparseable, non-positive, or out of range.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            nudge_threshold: positive_duration(
                std::env::var("FOLLOWUP_NUDGE_THRESHOLD_HOURS").ok().as_deref(),
                Duration::try_hours,
            )
            .unwrap_or(defaults.nudge_threshold),
            recency_window: positive_duration(
                std::env::var("FOLLOWUP_RECENCY_WINDOW_DAYS").ok().as_deref(),
                Duration::try_days,
            )
            .unwrap_or(defaults.recency_window),
        }
    }

    /// Reject non-positive durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nudge_threshold <= Duration::zero() {
            return Err(ConfigError::InvalidValue {
                key: "nudge_threshold".into(),
                message: "must be positive".into(),
            });
        }
        if self.recency_window <= Duration::zero() {
            return Err(ConfigError::InvalidValue {
                key: "recency_window".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Parse a positive integer count into a duration with `unit`.
///
/// `None` for missing, unparseable, non-positive, or overflowing values.
fn positive_duration(raw: Option<&str>, unit: fn(i64) -> Option<Duration>) -> Option<Duration> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(unit)
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Bearer token required on `/api/*` routes. `None` disables the check.
    pub api_key: Option<SecretString>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("FOLLOWUP_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = std::env::var("FOLLOWUP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let api_key = std::env::var("FOLLOWUP_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        Self {
            bind_addr,
            port,
            api_key,
        }
    }

    /// `host:port` string for binding the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
