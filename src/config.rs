use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_base_url: String,
    pub public_rps: u32,
    pub api_rps: u32,
    pub app_env: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage = match env::var("STORAGE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(Error::Config(format!(
                    "Invalid value for STORAGE: {} (expected postgres or memory)",
                    other
                )))
            }
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            storage,
            database_url,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_days: validate_ttl_days(get_env_parse_or("JWT_TTL_DAYS", 60)?)?,
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_max_tokens: get_env_parse_or("OPENAI_MAX_TOKENS", 2000)?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            public_rps: get_env_parse_or("PUBLIC_RPS", 100)?,
            api_rps: get_env_parse_or("API_RPS", 100)?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

const MAX_TTL_DAYS: i64 = 3650;

/// Token lifetimes outside `1..=MAX_TTL_DAYS` are rejected at startup.
fn validate_ttl_days(days: i64) -> Result<i64> {
    if (1..=MAX_TTL_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(Error::Config(format!(
            "Invalid value for JWT_TTL_DAYS: {} (expected 1 to {})",
            days, MAX_TTL_DAYS
        )))
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

/// Development mode exposes internal error detail in responses.
/// Reads nothing before `init_config` has run.
pub fn is_development() -> bool {
    CONFIG.get().map(Config::is_development).unwrap_or(false)
}
