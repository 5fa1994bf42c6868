use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream nameserver endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
}

impl DnsProtocol {
    pub fn udp(addr: SocketAddr) -> Self {
        DnsProtocol::Udp { addr }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } => *addr,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Udp { .. } => "UDP",
            DnsProtocol::Tcp { .. } => "TCP",
        }
    }
}

fn parse_socket_addr(s: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let bare = s.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| format!("Invalid address '{}'", s))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_socket_addr(addr_str)
                .map_err(|_| format!("Invalid UDP address '{}'", addr_str))?;
            return Ok(DnsProtocol::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_socket_addr(addr_str)
                .map_err(|_| format!("Invalid TCP address '{}'", addr_str))?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if s.contains("://") {
            return Err(format!(
                "Unsupported upstream scheme in '{}'. Expected udp:// or tcp://",
                s
            ));
        }
        parse_socket_addr(s)
            .map(|addr| DnsProtocol::Udp { addr })
            .map_err(|_| {
                format!(
                    "Invalid DNS endpoint format: '{}'. Expected: udp://IP:PORT, tcp://IP:PORT, IP:PORT or IP",
                    s
                )
            })
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}
