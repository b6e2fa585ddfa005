//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::store::StoreConfig;

/// Port used when `PORT` isn't set.
pub const DEFAULT_PORT: u16 = 10000;

/// Errors from reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: expected a number 0-65535")]
    InvalidPort(String),

    #[error("invalid HOST {0:?}: expected an IP address")]
    InvalidHost(String),
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address to listen on
    pub host: IpAddr,
    pub port: u16,
    /// Primary JSON document
    pub data_file: PathBuf,
    /// Bundled document used on first run
    pub seed_file: PathBuf,
    /// Directory for uploaded images, served at `/static`
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_file: PathBuf::from("data.json"),
            seed_file: PathBuf::from("seed.json"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(host) = lookup("HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHost(host))?;
        }
        if let Some(path) = lookup("DATA_FILE") {
            config.data_file = path.into();
        }
        if let Some(path) = lookup("SEED_FILE") {
            config.seed_file = path.into();
        }
        if let Some(path) = lookup("STATIC_DIR") {
            config.static_dir = path.into();
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Store configuration for the data and seed files.
    pub fn store(&self) -> StoreConfig {
        StoreConfig::new(&self.data_file).with_seed(&self.seed_file)
    }
}
