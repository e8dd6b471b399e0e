//! Configuration loading from environment variables.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Server settings. Command-line flags override these after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
    /// Static assets served for paths no API route matches
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Load settings from the environment.
    ///
    /// Reads `STUDYSYNC_HOST`, `PORT`, `STUDYSYNC_DATA_DIR` and
    /// `STUDYSYNC_PUBLIC_DIR`, either from the environment or from a `.env`
    /// file. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {:?}", value))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("STUDYSYNC_HOST").unwrap_or(defaults.host),
            port,
            data_dir: lookup("STUDYSYNC_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            public_dir: lookup("STUDYSYNC_PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("STUDYSYNC_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STUDYSYNC_DATA_DIR", "/var/lib/studysync"),
            ("STUDYSYNC_PUBLIC_DIR", "assets"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/studysync"));
        assert_eq!(config.public_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid PORT"));
    }
}
