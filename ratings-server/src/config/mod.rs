//! Environment-driven configuration for the ratings server.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use ratings_ledger::LedgerSource;
use ratings_shared::types::Ratings;
use tracing::info;

use crate::errors::ConfigError;

/// Default bind address.
const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
const DEFAULT_PORT: u16 = 8787;

/// Default CORS origins, the usual local frontend dev servers.
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173";

/// Ratings server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Persist aggregates here instead of keeping them in memory.
    pub data_dir: Option<PathBuf>,
    /// JSON file with the base ratings the in-memory ledger starts from.
    pub seed_file: Option<PathBuf>,
    /// Delay responses like a remote ledger would.
    pub simulated_latency: bool,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RATINGS_SERVER_HOST`: bind address (default: 127.0.0.1)
    /// - `RATINGS_SERVER_PORT`: listen port (default: 8787)
    /// - `RATINGS_DATA_DIR`: directory for persisted aggregates (default: in-memory)
    /// - `RATINGS_SEED_FILE`: base ratings JSON for the in-memory ledger
    /// - `RATINGS_SIMULATED_LATENCY`: "true" to delay responses (default: false)
    /// - `RATINGS_ALLOWED_ORIGINS`: comma-separated CORS origins
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            host: parse_var("RATINGS_SERVER_HOST", DEFAULT_HOST)?,
            port: parse_var("RATINGS_SERVER_PORT", &DEFAULT_PORT.to_string())?,
            data_dir: env::var("RATINGS_DATA_DIR").ok().map(PathBuf::from),
            seed_file: env::var("RATINGS_SEED_FILE").ok().map(PathBuf::from),
            simulated_latency: parse_var("RATINGS_SIMULATED_LATENCY", "false")?,
            allowed_origins: env::var("RATINGS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        };

        info!(?config, "Loaded server configuration");
        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pick the ledger backing this server.
    pub fn ledger_source(&self) -> Result<LedgerSource, ConfigError> {
        if let Some(data_dir) = &self.data_dir {
            return Ok(LedgerSource::local(data_dir));
        }

        let seed = match &self.seed_file {
            Some(path) => load_seed(path)?,
            None => Ratings::new(),
        };

        Ok(if self.simulated_latency {
            LedgerSource::simulated(seed)
        } else {
            LedgerSource::memory(seed)
        })
    }
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: value.clone(),
            reason: e.to_string(),
        })
}

fn load_seed(path: &PathBuf) -> Result<Ratings, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedFile {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::SeedParse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        for key in [
            "RATINGS_SERVER_HOST",
            "RATINGS_SERVER_PORT",
            "RATINGS_DATA_DIR",
            "RATINGS_SEED_FILE",
            "RATINGS_SIMULATED_LATENCY",
            "RATINGS_ALLOWED_ORIGINS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env_vars();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:8787");
        assert!(config.data_dir.is_none());
        assert!(!config.simulated_latency);
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(matches!(
            config.ledger_source().unwrap(),
            LedgerSource::Memory { .. }
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_port() {
        clear_env_vars();
        env::set_var("RATINGS_SERVER_PORT", "eighty");
        let err = ServerConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "RATINGS_SERVER_PORT", .. }));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_data_dir_selects_local_ledger() {
        clear_env_vars();
        env::set_var("RATINGS_DATA_DIR", "/tmp/ratings");
        let config = ServerConfig::from_env().unwrap();
        assert!(matches!(
            config.ledger_source().unwrap(),
            LedgerSource::Local { .. }
        ));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_seed_file_is_loaded() {
        clear_env_vars();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{"vintage":{"likes":5,"dislikes":2}}"#).unwrap();
        env::set_var("RATINGS_SEED_FILE", &path);

        let config = ServerConfig::from_env().unwrap();
        match config.ledger_source().unwrap() {
            LedgerSource::Memory { seed, .. } => assert_eq!(seed["vintage"].likes, 5),
            other => panic!("unexpected source {other:?}"),
        }
        clear_env_vars();
    }
}
