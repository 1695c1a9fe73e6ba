// Runtime settings read from the environment (and a `.env` file, if any)

use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEV_JWT_SECRET: &str = "dev-secret-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Absent means the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `JWT_SECRET` and
    /// `BIND_ADDR`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            warn!("DATABASE_URL not set, data is kept in memory only");
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, None);
        assert_eq!(s.database_max_connections, 5);
        assert_eq!(s.jwt_secret, "dev-secret-key");
        assert_eq!(s.bind_addr.port(), 3000);
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/padel"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/padel"));
        assert_eq!(s.database_max_connections, 12);
        assert_eq!(s.jwt_secret, "s3cret");
        assert_eq!(s.bind_addr.port(), 8080);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(settings(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert!(settings(&[("BIND_ADDR", "nowhere")]).is_err());
    }
}
