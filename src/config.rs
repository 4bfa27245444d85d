use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "todos.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Error, PartialEq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub database_pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError {
                key: "PORT",
                reason: e.to_string(),
                value,
            })?,
            None => defaults.port,
        };

        let database_pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(value) => match value.parse::<u32>() {
                Ok(size) if size > 0 => size,
                Ok(_) => {
                    return Err(ConfigError {
                        key: "DATABASE_POOL_SIZE",
                        reason: "must be greater than zero".to_string(),
                        value,
                    })
                }
                Err(e) => {
                    return Err(ConfigError {
                        key: "DATABASE_POOL_SIZE",
                        reason: e.to_string(),
                        value,
                    })
                }
            },
            None => defaults.database_pool_size,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database_pool_size,
        })
    }

    /// A private in-memory database. The pool is pinned to a single connection
    /// because every SQLite `:memory:` connection is its own database.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            database_url: ":memory:".to_string(),
            database_pool_size: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "/tmp/todos.db"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATABASE_POOL_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "/tmp/todos.db");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_pool_size, 4);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_POOL_SIZE", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
