//! Service configuration from TOML or environment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default host address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port number
pub const DEFAULT_PORT: u16 = 8000;

/// Default directory searched for catalog files
pub const DEFAULT_DATA_DIR: &str = "Data";

/// Service configuration
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding the catalog CSV files
    pub data_dir: PathBuf,

    /// Serve the built-in five-recipe catalog instead of loading files
    pub use_sample: bool,

    /// Neighbors returned when a request does not say
    pub default_neighbors: usize,

    /// Log level for tracing
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            use_sample: false,
            default_neighbors: lerecette::DEFAULT_NEIGHBORS,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment overrides
    ///
    /// Environment variables:
    /// - `LEMENU_HOST` - Server host
    /// - `LEMENU_PORT` - Server port
    /// - `LEMENU_DATA_DIR` - Catalog directory
    /// - `LEMENU_DEFAULT_NEIGHBORS` - Default neighbor count
    /// - `LEMENU_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
    ///
    /// Unparseable numbers are ignored.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(host) = std::env::var("LEMENU_HOST") {
            self.host = host;
        }

        if let Ok(port) = std::env::var("LEMENU_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.port = port;
            }
        }

        if let Ok(dir) = std::env::var("LEMENU_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Ok(k) = std::env::var("LEMENU_DEFAULT_NEIGHBORS") {
            if let Ok(k) = k.parse::<usize>() {
                self.default_neighbors = k;
            }
        }

        if let Ok(level) = std::env::var("LEMENU_LOG_LEVEL") {
            self.log_level = level;
        }

        self
    }

    /// Defaults with environment overrides
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid address: {}", e))
    }

    /// Full server URL, e.g. "http://127.0.0.1:8000"
    #[must_use]
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be zero".to_string());
        }

        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.default_neighbors == 0 {
            return Err("Default neighbor count must be greater than zero".to_string());
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, PathBuf::from("Data"));
        assert!(!config.use_sample);
        assert_eq!(config.default_neighbors, 5);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("LEMENU_HOST", "0.0.0.0");
        std::env::set_var("LEMENU_PORT", "9090");
        std::env::set_var("LEMENU_DATA_DIR", "/tmp/recipes");
        std::env::set_var("LEMENU_DEFAULT_NEIGHBORS", "not-a-number");
        std::env::set_var("LEMENU_LOG_LEVEL", "debug");

        let config = ServiceConfig::from_env();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/recipes"));
        assert_eq!(config.default_neighbors, 5);
        assert_eq!(config.log_level, "debug");

        // Clean up
        std::env::remove_var("LEMENU_HOST");
        std::env::remove_var("LEMENU_PORT");
        std::env::remove_var("LEMENU_DATA_DIR");
        std::env::remove_var("LEMENU_DEFAULT_NEIGHBORS");
        std::env::remove_var("LEMENU_LOG_LEVEL");
    }

    #[test]
    fn test_config_from_file_partial() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "port = 3000").expect("write");
        writeln!(file, "use_sample = true").expect("write");

        let config = ServiceConfig::from_file(file.path()).expect("parse config");
        assert_eq!(config.port, 3000);
        assert!(config.use_sample);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_config_from_file_invalid() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "port = \"high\"").expect("write");
        assert!(ServiceConfig::from_file(file.path()).is_err());
        assert!(ServiceConfig::from_file("/nonexistent/lemenu.toml").is_err());
    }

    #[test]
    fn test_config_socket_addr() {
        let config = ServiceConfig::default();
        let addr = config.socket_addr().expect("default address is valid");
        assert_eq!(addr.port(), DEFAULT_PORT);
        assert_eq!(config.server_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_config_validate_errors() {
        let cases = [
            ServiceConfig { port: 0, ..Default::default() },
            ServiceConfig { host: String::new(), ..Default::default() },
            ServiceConfig { default_neighbors: 0, ..Default::default() },
            ServiceConfig { log_level: "loud".to_string(), ..Default::default() },
        ];
        for config in cases {
            assert!(config.validate().is_err());
        }
    }
}
