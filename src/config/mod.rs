//! Application configuration management

use std::env;

use anyhow::{Context, Result};

use crate::graphql::SchemaLimits;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// HS256 secret for bearer token verification. Without it, tokens are
    /// ignored and every request is anonymous.
    pub jwt_secret: Option<String>,

    /// Permit every operation regardless of caller (development only)
    pub auth_disabled: bool,

    pub log_format: LogFormat,

    /// GraphQL query depth/complexity limits
    pub schema_limits: SchemaLimits,
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SchemaLimits::default();

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => anyhow::bail!("Invalid LOG_FORMAT {:?}: expected json or pretty", other),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "8089".to_string())
                .parse()
                .context("Invalid PORT")?,

            jwt_secret: lookup("JWT_SECRET")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),

            auth_disabled: lookup("AUTH_DISABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),

            log_format,

            schema_limits: SchemaLimits {
                max_depth: match lookup("GRAPHQL_MAX_DEPTH") {
                    Some(v) => v.parse().context("Invalid GRAPHQL_MAX_DEPTH")?,
                    None => defaults.max_depth,
                },
                max_complexity: match lookup("GRAPHQL_MAX_COMPLEXITY") {
                    Some(v) => v.parse().context("Invalid GRAPHQL_MAX_COMPLEXITY")?,
                    None => defaults.max_complexity,
                },
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
