use anyhow::{Context, Result};
use evaluator::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub evaluator_url: String,
    pub evaluator_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: var("HOST").context("Cannot load HOST env variable")?,
            port: var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: var("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?,
            evaluator_url: var("EVALUATOR_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            evaluator_timeout_secs: match var("EVALUATOR_TIMEOUT_SECS") {
                Some(value) => value
                    .parse()
                    .context("EVALUATOR_TIMEOUT_SECS must be a number of seconds")?,
                None => DEFAULT_TIMEOUT_SECS,
            },
            max_upload_bytes: match var("MAX_UPLOAD_BYTES") {
                Some(value) => value
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/hackathons"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.evaluator_url, DEFAULT_BASE_URL);
        assert_eq!(config.evaluator_timeout_secs, 300);
        assert_eq!(config.max_upload_bytes, 52_428_800);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let result = Config::from_lookup(lookup(&[("HOST", "0.0.0.0"), ("PORT", "8080")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port_fails() {
        let result = Config::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "eighty"),
            ("DATABASE_URL", "postgres://localhost/hackathons"),
        ]));
        assert!(result.is_err());
    }
}
