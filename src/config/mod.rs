//! Configuration module for the Chengyu backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file holding the durable storage slots
    pub db_path: PathBuf,
    /// Directory with `idioms.json` and `discriminations.json` overriding the bundled catalog
    pub catalog_dir: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CHENGYU_DB_PATH")
            .unwrap_or_else(|_| "./data/chengyu.sqlite".to_string())
            .into();

        let catalog_dir = env::var("CHENGYU_CATALOG_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let raw_addr = env::var("CHENGYU_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CHENGYU_BIND_ADDR {:?}: {}", raw_addr, e)))?;

        let log_level = env::var("CHENGYU_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            db_path,
            catalog_dir,
            bind_addr,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch the same process-wide variables, so they run in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("CHENGYU_DB_PATH");
        env::remove_var("CHENGYU_CATALOG_DIR");
        env::remove_var("CHENGYU_BIND_ADDR");
        env::remove_var("CHENGYU_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/chengyu.sqlite"));
        assert!(config.catalog_dir.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");

        env::set_var("CHENGYU_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        env::remove_var("CHENGYU_BIND_ADDR");
    }
}
