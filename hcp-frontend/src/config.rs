use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_LOCATION: &str = "eastus";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}' (expected 'text' or 'json')", other),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Listen port
    pub port: u16,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
    /// Azure region served by this frontend
    pub location: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::Text,
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load from .env if present, then the process environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset variables
    /// take their defaults; set but unparseable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            port: parse_var(&lookup, "FRONTEND_PORT")?.unwrap_or(defaults.port),
            max_body_bytes: parse_var(&lookup, "FRONTEND_MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
            log_format: parse_var(&lookup, "FRONTEND_LOG_FORMAT")?.unwrap_or(defaults.log_format),
            location: lookup("FRONTEND_LOCATION")
                .map(|l| l.trim().to_ascii_lowercase())
                .filter(|l| !l.is_empty())
                .unwrap_or(defaults.location),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid value '{}' for {}", raw, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8443);
        assert_eq!(config.max_body_bytes, 4 * 1024 * 1024);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.location, "eastus");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FRONTEND_PORT", "9000"),
            ("FRONTEND_MAX_BODY_BYTES", "1024"),
            ("FRONTEND_LOG_FORMAT", "JSON"),
            ("FRONTEND_LOCATION", "WestUS3"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.location, "westus3");
    }

    #[test]
    fn test_invalid_values_fail() {
        let err = AppConfig::from_lookup(lookup(&[("FRONTEND_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("FRONTEND_PORT"));
        assert!(AppConfig::from_lookup(lookup(&[("FRONTEND_LOG_FORMAT", "xml")])).is_err());
    }
}
