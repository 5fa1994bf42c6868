pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_dyndns_domain::{DnsProtocol, DomainError};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

pub fn create_transport(protocol: &DnsProtocol) -> Transport {
    match protocol {
        DnsProtocol::Udp { addr } => Transport::Udp(udp::UdpTransport::new(*addr)),
        DnsProtocol::Tcp { addr } => Transport::Tcp(tcp::TcpTransport::new(*addr)),
    }
}

/// Maps a socket error to the transport error the failover logic understands.
pub(crate) fn map_io_error(server: SocketAddr, context: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            DomainError::TransportConnectionReset {
                server: server.to_string(),
            }
        }
        io::ErrorKind::TimedOut => DomainError::TransportTimeout {
            server: server.to_string(),
        },
        _ => DomainError::IoError(format!("{} {}: {}", context, server, e)),
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}
