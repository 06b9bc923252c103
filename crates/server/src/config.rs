//! Server configuration from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const DATA_DIR_VAR: &str = "TASKLIST_DATA_DIR";
pub const PORT_VAR: &str = "PORT";
pub const BIND_ADDR_VAR: &str = "TASKLIST_BIND_ADDR";
pub const PUBLIC_DIR_VAR: &str = "TASKLIST_PUBLIC_DIR";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = var(DATA_DIR_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(DATA_DIR_VAR))?;

        let port = match var(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_VAR,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let ip = match var(BIND_ADDR_VAR) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                value: raw,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let public_dir = var(PUBLIC_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            data_dir,
            bind_addr: SocketAddr::new(ip, port),
            public_dir,
        })
    }
}
