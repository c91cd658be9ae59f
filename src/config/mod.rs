use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_database: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub health_check_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_host: "127.0.0.1".into(),
            db_port: 27017,
            db_database: "files_manager".into(),
            redis_url: "redis://127.0.0.1:6379".into(),
            server_host: "0.0.0.0".into(),
            server_port: 5000,
            health_check_timeout_ms: 2000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置；未设置的项使用默认值，设置了但无法解析的项报错
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            db_host: lookup("DB_HOST").unwrap_or(defaults.db_host),
            db_port: parse_or(&lookup, "DB_PORT", defaults.db_port)?,
            db_database: lookup("DB_DATABASE").unwrap_or(defaults.db_database),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "PORT", defaults.server_port)?,
            health_check_timeout_ms: parse_or(
                &lookup,
                "HEALTH_CHECK_TIMEOUT_MS",
                defaults.health_check_timeout_ms,
            )?,
        })
    }

    pub fn mongodb_uri(&self) -> String {
        format!(
            "mongodb://{}:{}/{}",
            self.db_host, self.db_port, self.db_database
        )
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}
