use serde::Deserialize;

use super::dynamic::DynamicConfig;
use super::errors::ConfigError;
use super::fallback::FallbackConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::DnsProtocol;
use std::net::SocketAddr;

const LOCAL_CONFIG_PATH: &str = "ferrous-dyndns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-dyndns/config.toml";

/// Main configuration structure for Ferrous DynDNS
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Synthesized answer configuration
    #[serde(default)]
    pub dynamic: DynamicConfig,

    /// Upstream resolver configuration
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-dyndns.toml in current directory
    /// 3. /etc/ferrous-dyndns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(pattern) = overrides.pattern {
            self.dynamic.pattern = pattern;
        }
        if let Some(prefix) = overrides.network_prefix {
            self.dynamic.network_prefix = prefix;
        }
        if let Some(path) = overrides.resolv_conf_path {
            self.fallback.resolv_conf_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.dns_socket_addr()?;

        self.dynamic.validate()?;

        if self.fallback.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Fallback query timeout must be at least 1 second".to_string(),
            ));
        }

        if self.fallback.attempts == 0 {
            return Err(ConfigError::Validation(
                "Fallback attempts must be at least 1".to_string(),
            ));
        }

        for server in &self.fallback.upstream_servers {
            server.parse::<DnsProtocol>().map_err(ConfigError::Validation)?;
        }

        Ok(())
    }

    /// Listener socket address string, e.g. `0.0.0.0:10053`
    pub fn dns_listen_addr(&self) -> String {
        if self.server.bind_address.contains(':') && !self.server.bind_address.starts_with('[') {
            format!("[{}]:{}", self.server.bind_address, self.server.dns_port)
        } else {
            format!("{}:{}", self.server.bind_address, self.server.dns_port)
        }
    }

    pub fn dns_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.dns_listen_addr().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Invalid bind address '{}'",
                self.server.bind_address
            ))
        })
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub pattern: Option<String>,
    pub network_prefix: Option<String>,
    pub resolv_conf_path: Option<String>,
    pub log_level: Option<String>,
}
