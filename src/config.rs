use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use dotenvy::dotenv;
use strum_macros::{Display as StrumDisplay, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub api_prefix: String,

    // Pagination
    pub default_page_size: u64,
    pub max_page_size: u64,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    // Demo data
    pub seed_demo_data: bool,
    pub demo_employees: usize,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::Memory)?,
            database_url: lookup("DATABASE_URL"),
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            default_page_size: parse_or(&lookup, "DEFAULT_PAGE_SIZE", 10)?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", 100)?,

            rate_api_per_min: parse_or(&lookup, "RATE_API_PER_MIN", 1000)?,

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::DEBUG)?,

            seed_demo_data: parse_or(&lookup, "SEED_DEMO_DATA", false)?,
            demo_employees: parse_or(&lookup, "DEMO_EMPLOYEES", 128)?,
        };

        if config.store_backend == StoreBackend::Mysql && config.database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=mysql");
        }
        if config.max_page_size == 0 {
            bail!("MAX_PAGE_SIZE must be greater than 0");
        }
        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            bail!(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE ({})",
                config.max_page_size
            );
        }

        Ok(config)
    }
}
