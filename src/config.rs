use anyhow::{Context, anyhow};
use dotenvy::dotenv;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_analytics_per_min: u32,

    /// Used for companies without their own `utc_offset_minutes`.
    pub default_utc_offset_minutes: i32,
    /// 0 disables the background scan.
    pub anomaly_scan_interval_secs: u64,

    pub log_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_analytics_per_min: parsed_or("RATE_ANALYTICS_PER_MIN", 120)?,
            default_utc_offset_minutes: parsed_or("DEFAULT_UTC_OFFSET_MINUTES", 0)?,
            anomaly_scan_interval_secs: parsed_or("ANOMALY_SCAN_INTERVAL_SECS", 3600)?, // hourly
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_or_falls_back_when_unset() {
        let value: u32 = parsed_or("WFI_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn required_names_the_missing_variable() {
        let err = required("WFI_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(err.to_string().contains("WFI_TEST_SURELY_UNSET_VARIABLE must be set"));
    }
}
