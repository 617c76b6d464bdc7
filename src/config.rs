//! Runtime configuration loaded from environment variables.

use std::time::Duration;

use crate::poller::PollConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("API_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Client configuration.
///
/// All fields have defaults suitable for a backend on the same machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin, without trailing `/`
    pub api_base_url: String,
    pub violation_poll: Duration,
    pub video_poll: Duration,
    pub request_timeout: Duration,
    /// Lifetime of a toast notification
    pub notification_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            violation_poll: Duration::from_secs(5),
            video_poll: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            notification_ttl: Duration::from_secs(3),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `API_BASE_URL`          | `http://localhost:5000` |
    /// | `VIOLATION_POLL_SECS`   | `5`                     |
    /// | `VIDEO_POLL_SECS`       | `5`                     |
    /// | `REQUEST_TIMEOUT_SECS`  | `10`                    |
    /// | `NOTIFICATION_TTL_SECS` | `3`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = match lookup("API_BASE_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidBaseUrl(url));
                }
                url
            }
            None => defaults.api_base_url,
        };

        let secs = |var: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(value) => match value.trim().parse::<u64>() {
                    Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
                    _ => Err(ConfigError::InvalidNumber { var, value }),
                },
            }
        };

        Ok(Self {
            api_base_url,
            violation_poll: secs("VIOLATION_POLL_SECS", defaults.violation_poll)?,
            video_poll: secs("VIDEO_POLL_SECS", defaults.video_poll)?,
            request_timeout: secs("REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            notification_ttl: secs("NOTIFICATION_TTL_SECS", defaults.notification_ttl)?,
        })
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            violations_every: self.violation_poll,
            videos_every: self.video_poll,
        }
    }
}
