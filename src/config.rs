use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup and handed to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the server runs on in-memory stores.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
