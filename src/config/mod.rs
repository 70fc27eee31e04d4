use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_DATABASE_URL: &str = "sqlite://helping_hands.db?mode=rwc";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub allowed_origins: String,
    /// How long a login token stays valid.
    pub session_ttl: Duration,
    /// Enables HSTS.
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("SESSION_TTL_SECS") {
            config.session_ttl = match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_SECS",
                        value,
                    })
                }
            };
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.allowed_origins = origins;
        }
        if let Some(env) = lookup("RUST_ENV") {
            config.production = env.eq_ignore_ascii_case("production");
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            production: false,
        }
    }
}
