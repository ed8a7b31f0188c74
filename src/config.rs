// src/config.rs
//! Runtime configuration, read from the environment once at startup.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Bind address | `127.0.0.1` |
//! | `PORT` | First port tried when binding | `5000` |
//! | `ACCESS_TOKEN` | HS256 signing secret | unset |
//! | `DOCUMENT_STORE` | `postgres` or `memory` | `postgres` |
//! | `DATABASE_URL` | Postgres connection URL | required for `postgres` |
//! | `DATABASE_MAX_CONNECTIONS` | Pool size | `5` |

use std::net::IpAddr;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { url: String, max_connections: u32 },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub signing_secret: Option<String>,
    pub store: StoreBackend,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{0} must be set")]
    Missing(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be tested
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or("HOST", lookup("HOST"), DEFAULT_HOST.parse().ok())?;
        let port = parse_or("PORT", lookup("PORT"), Some(DEFAULT_PORT))?;
        let signing_secret = lookup("ACCESS_TOKEN").filter(|s| !s.is_empty());

        let store = match lookup("DOCUMENT_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres {
                url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    lookup("DATABASE_MAX_CONNECTIONS"),
                    Some(DEFAULT_MAX_CONNECTIONS),
                )?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid { var: "DOCUMENT_STORE", value: other.to_string() })
            }
        };

        Ok(Self { host, port, signing_secret, store })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
        None => default.ok_or(ConfigError::Missing(var)),
    }
}
