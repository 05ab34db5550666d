//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use tabletime::auth::{AdminCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

/// Default bind address
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Admin credentials checked by `authenticate`
    pub admin: AdminConfig,
    /// Channel sizing
    pub channels: ChannelConfig,
    /// Inbound rate limits per connection
    pub rate_limit: RateLimitConfig,
    /// Prometheus exporter address (disabled when unset)
    pub metrics_bind: Option<SocketAddr>,
}

/// Admin login configuration
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl AdminConfig {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.username, &self.password)
    }
}

/// Queue sizes
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Outbound events buffered per connection before it is evicted
    pub client_capacity: usize,
    /// Pending messages buffered for the floor actor
    pub floor_inbox_capacity: usize,
}

/// Sliding-window limits for inbound frames
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Frames allowed per second
    pub burst: usize,
    /// Frames allowed per minute
    pub sustained: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            admin: AdminConfig {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
            },
            channels: ChannelConfig {
                client_capacity: 64,
                floor_inbox_capacity: tabletime::sync::DEFAULT_INBOX_CAPACITY,
            },
            rate_limit: RateLimitConfig {
                burst: 10,
                sustained: 100,
            },
            metrics_bind: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_var("SERVER_BIND")?.unwrap_or(defaults.bind),
        };

        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
        };

        let channels = ChannelConfig {
            client_capacity: parse_env_var("CLIENT_CHANNEL_CAPACITY")?
                .unwrap_or(defaults.channels.client_capacity),
            floor_inbox_capacity: parse_env_var("FLOOR_INBOX_CAPACITY")?
                .unwrap_or(defaults.channels.floor_inbox_capacity),
        };

        let rate_limit = RateLimitConfig {
            burst: parse_env_var("WS_BURST_LIMIT")?.unwrap_or(defaults.rate_limit.burst),
            sustained: parse_env_var("WS_SUSTAINED_LIMIT")?
                .unwrap_or(defaults.rate_limit.sustained),
        };

        let metrics_bind = parse_env_var("METRICS_BIND")?;

        Ok(ServerConfig {
            bind,
            admin,
            channels,
            rate_limit,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "ADMIN_USERNAME".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.admin.password.is_empty() {
            return Err(ConfigError::Invalid {
                var: "ADMIN_PASSWORD".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        let positive = [
            ("CLIENT_CHANNEL_CAPACITY", self.channels.client_capacity),
            ("FLOOR_INBOX_CAPACITY", self.channels.floor_inbox_capacity),
            ("WS_BURST_LIMIT", self.rate_limit.burst),
            ("WS_SUSTAINED_LIMIT", self.rate_limit.sustained),
        ];
        for (var, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
        }

        if self.channels.client_capacity < 2 {
            return Err(ConfigError::Invalid {
                var: "CLIENT_CHANNEL_CAPACITY".to_string(),
                reason: "Must be at least 2 (init snapshot plus one update)".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Parse an optional environment variable, failing on malformed values
fn parse_env_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, std::env::var(key).ok())
}

/// Parse a raw setting; blank counts as unset
fn parse_value<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}
