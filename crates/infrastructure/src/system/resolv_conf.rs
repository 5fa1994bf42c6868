use crate::dns::resolver::UpstreamSettings;
use ferrous_dyndns_domain::{DnsProtocol, DomainError, FallbackConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

/// Used when resolv.conf is missing or lists no usable nameserver.
pub const DEFAULT_NAMESERVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 53);

/// The parts of resolv.conf(5) that matter for forwarding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<SocketAddr>,
    pub timeout: Option<u64>,
    pub attempts: Option<u32>,
}

impl ResolvConf {
    pub fn parse(content: &str) -> Self {
        let mut conf = ResolvConf::default();

        for (line_num, raw) in content.lines().enumerate() {
            let line = match raw.find(['#', ';']) {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let mut fields = line.split_whitespace();
            let Some(keyword) = fields.next() else {
                continue;
            };

            match keyword {
                "nameserver" => match fields.next().map(parse_nameserver) {
                    Some(Some(addr)) => conf.nameservers.push(addr),
                    _ => warn!(line = line_num + 1, entry = raw.trim(), "Ignoring unusable nameserver"),
                },
                "options" => {
                    for option in fields {
                        if let Some(value) = option.strip_prefix("timeout:") {
                            conf.timeout = value.parse().ok().filter(|t| *t > 0);
                        } else if let Some(value) = option.strip_prefix("attempts:") {
                            conf.attempts = value.parse().ok().filter(|a| *a > 0);
                        }
                    }
                }
                _ => {}
            }
        }

        debug!(
            nameservers = conf.nameservers.len(),
            timeout = ?conf.timeout,
            attempts = ?conf.attempts,
            "resolv.conf parsed"
        );
        conf
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            DomainError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&content))
    }

    /// Nameservers as UDP upstreams, or the local default when none are listed.
    pub fn upstreams(&self) -> Vec<DnsProtocol> {
        if self.nameservers.is_empty() {
            return vec![DnsProtocol::udp(DEFAULT_NAMESERVER)];
        }
        self.nameservers.iter().copied().map(DnsProtocol::udp).collect()
    }

    /// Options in the file win over `config`; `config` supplies the rest.
    pub fn to_settings(&self, config: &FallbackConfig) -> UpstreamSettings {
        UpstreamSettings::new(
            self.upstreams(),
            Duration::from_secs(self.timeout.unwrap_or(config.query_timeout)),
            self.attempts.unwrap_or(config.attempts),
        )
    }
}

fn parse_nameserver(value: &str) -> Option<SocketAddr> {
    // Scoped IPv6 addresses (fe80::1%eth0) carry a zone we cannot route with.
    IpAddr::from_str(value)
        .ok()
        .map(|ip| SocketAddr::new(ip, 53))
}

/// Resolves the upstream settings for `config`.
///
/// Explicit `upstream_servers` take precedence. Otherwise resolv.conf is read
/// and an unreadable file falls back to [`DEFAULT_NAMESERVER`].
pub async fn load_upstream_settings(config: &FallbackConfig) -> Result<UpstreamSettings, DomainError> {
    if !config.upstream_servers.is_empty() {
        let servers = config
            .upstream_servers
            .iter()
            .map(|s| DnsProtocol::from_str(s).map_err(DomainError::ConfigError))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(UpstreamSettings::from_config(config, servers));
    }

    match ResolvConf::load(&config.resolv_conf_path).await {
        Ok(conf) => Ok(conf.to_settings(config)),
        Err(e) => {
            warn!(
                path = %config.resolv_conf_path,
                error = %e,
                default = %DEFAULT_NAMESERVER,
                "resolv.conf unavailable, using default nameserver"
            );
            Ok(ResolvConf::default().to_settings(config))
        }
    }
}
