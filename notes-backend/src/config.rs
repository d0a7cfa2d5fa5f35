use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// HMAC key for bearer tokens. Required; the server refuses to start without it.
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    pub const TOKEN_TTL_DAYS: &str = "TOKEN_TTL_DAYS";
    /// Allowed CORS origin for the web client. Any origin is allowed when unset.
    pub const FRONTEND_URL: &str = "FRONTEND_URL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const TOKEN_TTL_DAYS: i64 = 7;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub token_ttl_days: i64,
    pub frontend_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("db_pool_size", &self.db_pool_size)
            .field("token_ttl_days", &self.token_ttl_days)
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(env_vars::JWT_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(env_vars::JWT_SECRET))?;

        Ok(Self {
            jwt_secret,
            port: parse_or(&lookup, env_vars::PORT, defaults::PORT)?,
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or(&lookup, env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE)?,
            token_ttl_days: parse_or(&lookup, env_vars::TOKEN_TTL_DAYS, defaults::TOKEN_TTL_DAYS)?,
            frontend_url: lookup(env_vars::FRONTEND_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) if v > T::default() => Ok(v),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}
