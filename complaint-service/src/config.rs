//! Configuration module for environment variable parsing.
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file by the binary). The primary queue connection string is
//! required; everything else has a default.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default primary queue name.
pub const DEFAULT_QUEUE_NAME: &str = "complaints-event";

/// Default audit (unified log) queue name.
pub const DEFAULT_AUDIT_QUEUE_NAME: &str = "unified-logs";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// AMQP URI of the primary complaint queue broker
    pub queue_connection_string: String,

    /// Queue that receives complaint envelopes
    pub queue_name: String,

    /// AMQP URI of the unified log broker; `None` disables audit events
    pub audit_connection_string: Option<String>,

    /// Queue that receives audit events
    pub audit_queue_name: String,

    /// Service display name reported by the health endpoint
    pub app_name: String,

    /// Service version reported by the health endpoint
    pub app_version: String,

    /// Raises log verbosity to debug
    pub debug: bool,

    /// Address the web server binds to
    pub host: IpAddr,

    /// Port the web server listens on
    pub port: u16,

    /// Upper bound for a single connect or send against a queue
    pub send_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let queue_connection_string = get("COMPLAINT_SEND_PRIMARY_CONNECTION_STRING")
            .ok_or(ConfigError::Missing("COMPLAINT_SEND_PRIMARY_CONNECTION_STRING"))?;
        check_amqp_uri(
            "COMPLAINT_SEND_PRIMARY_CONNECTION_STRING",
            &queue_connection_string,
        )?;

        let audit_connection_string = get("UNIFIED_LOG_CONNECTION_STRING");
        if let Some(uri) = &audit_connection_string {
            check_amqp_uri("UNIFIED_LOG_CONNECTION_STRING", uri)?;
        }

        Ok(Config {
            queue_connection_string,

            queue_name: get("SERVICE_BUS_QUEUE_NAME")
                .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string()),

            audit_connection_string,

            audit_queue_name: get("UNIFIED_LOG_QUEUE_NAME")
                .unwrap_or_else(|| DEFAULT_AUDIT_QUEUE_NAME.to_string()),

            app_name: get("APP_NAME").unwrap_or_else(|| "ComplaintService".to_string()),

            app_version: get("APP_VERSION").unwrap_or_else(|| "0.1.0".to_string()),

            debug: match get("DEBUG") {
                Some(raw) => parse_bool("DEBUG", &raw)?,
                None => false,
            },

            host: parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,

            port: parse_or("PORT", get("PORT"), 8000)?,

            send_timeout_ms: parse_or("SEND_TIMEOUT_MS", get("SEND_TIMEOUT_MS"), 10_000)?,
        })
    }

    /// Whether audit events should be published.
    pub fn audit_enabled(&self) -> bool {
        self.audit_connection_string.is_some()
    }

    /// Socket address for the web server.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Default tracing filter directive when `RUST_LOG` is not set.
    ///
    /// The AMQP client is chatty at info level, so it is held to warnings.
    pub fn log_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        format!("{level},lapin=warn,amq_protocol=warn")
    }
}

/// Parse a boolean the way the deployment tooling writes them.
fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Connection strings are AMQP URIs; reject anything else at startup.
fn check_amqp_uri(var: &'static str, raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var,
        // Credentials live in the URI, so never echo it back.
        value: "<redacted>".to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "amqp" | "amqps" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}
