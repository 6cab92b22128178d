use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub trends_base_url: String,
    pub trends_hl: String,
    pub trends_tz: i32,
    pub trends_connect_timeout_secs: u64,
    pub trends_read_timeout_secs: u64,
    pub trends_request_delay_ms: u64,
    pub trends_default_region: String,
    pub cache_ttl_secs: u64,
    pub cache_max_capacity: u64,
    pub app_timezone: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            trends_base_url: env::var("TRENDS_BASE_URL")
                .unwrap_or_else(|_| "https://trends.google.com".to_string()),
            trends_hl: env::var("TRENDS_HL").unwrap_or_else(|_| "ko-KR".to_string()),
            trends_tz: parse_var("TRENDS_TZ", 540)?,
            trends_connect_timeout_secs: parse_var("TRENDS_CONNECT_TIMEOUT_SECS", 10)?,
            trends_read_timeout_secs: parse_var("TRENDS_READ_TIMEOUT_SECS", 25)?,
            trends_request_delay_ms: parse_var("TRENDS_REQUEST_DELAY_MS", 1000)?,
            trends_default_region: env::var("TRENDS_DEFAULT_REGION")
                .unwrap_or_else(|_| "KR".to_string()),
            cache_ttl_secs: parse_var("CACHE_TTL_SECS", 3600)?,
            cache_max_capacity: parse_var("CACHE_MAX_CAPACITY", 1000)?,
            app_timezone: env::var("APP_TIMEZONE").unwrap_or_else(|_| "Asia/Seoul".to_string()),
        };

        crate::utils::parse_timezone(&config.app_timezone).map_err(|e| anyhow::anyhow!(e))?;

        Ok(config)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.trends_request_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            trends_base_url: "https://trends.google.com".to_string(),
            trends_hl: "ko-KR".to_string(),
            trends_tz: 540,
            trends_connect_timeout_secs: 10,
            trends_read_timeout_secs: 25,
            trends_request_delay_ms: 1000,
            trends_default_region: "KR".to_string(),
            cache_ttl_secs: 3600,
            cache_max_capacity: 1000,
            app_timezone: "Asia/Seoul".to_string(),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is not valid: {}", name, e)),
        Err(_) => Ok(default),
    }
}
