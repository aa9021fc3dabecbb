use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

use super::dns::DnsConfig;
use super::env::EnvOverrides;
use super::errors::ConfigError;
use super::inventory::{InventoryConfig, InventorySource};
use super::logging::LoggingConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG_PATH: &str = "ingress-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ingress-dns/config.toml";

/// Main configuration structure for Ingress DNS
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, TCP)
    #[serde(default)]
    pub server: ServerConfig,

    /// Answer synthesis and fallback configuration
    #[serde(default)]
    pub dns: DnsConfig,

    /// Where routable hostnames come from
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ingress-dns.toml in current directory
    /// 3. /etc/ingress-dns/config.toml
    /// 4. Default configuration
    ///
    /// Environment overrides are applied on top of the file, then
    /// command-line overrides on top of both.
    pub fn load(
        path: Option<&str>,
        env_overrides: EnvOverrides,
        cli_overrides: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(env_overrides);
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_env_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(ip) = overrides.ingress_ip {
            self.dns.ingress_ip = Some(ip);
        }
        if let Some(server) = overrides.fallback_server {
            self.dns.fallback_server = server;
        }
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(ip) = overrides.ingress_ip {
            self.dns.ingress_ip = Some(ip);
        }
        if let Some(server) = overrides.fallback_server {
            self.dns.fallback_server = server;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if !overrides.static_hosts.is_empty() {
            self.inventory.source = InventorySource::Static;
            self.inventory.static_hosts = overrides.static_hosts;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.dns.ingress_ip.is_none() {
            return Err(ConfigError::Validation(
                "ingress_ip is required (set INGRESS_IP or dns.ingress_ip)".to_string(),
            ));
        }

        if self.dns.fallback_enabled {
            self.fallback_address()?;
        }

        if self.dns.query_timeout == 0 || self.dns.fallback_timeout == 0 {
            return Err(ConfigError::Validation(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        if self.inventory.source == InventorySource::Static && self.inventory.static_hosts.is_empty()
        {
            return Err(ConfigError::Validation(
                "Static inventory has no hosts".to_string(),
            ));
        }

        Ok(())
    }

    pub fn fallback_address(&self) -> Result<SocketAddr, ConfigError> {
        self.dns.fallback_server.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid fallback server '{}': {}",
                self.dns.fallback_server, e
            ))
        })
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub ingress_ip: Option<Ipv4Addr>,
    pub fallback_server: Option<String>,
    pub log_level: Option<String>,
    pub static_hosts: Vec<String>,
}
