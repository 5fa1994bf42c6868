//! UDP transport (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is, without framing. A response with the TC bit set
//! must be retried over TCP by the caller.

use super::{map_io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_dyndns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| map_io_error(server, "Failed to bind UDP socket for", e))?;

        // Connected sockets drop datagrams from any other source.
        socket
            .connect(server)
            .await
            .map_err(|e| map_io_error(server, "Failed to connect UDP socket to", e))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| timeout_error(server))?
            .map_err(|e| map_io_error(server, "Failed to send UDP query to", e))?;

        debug!(server = %server, bytes_sent, "UDP query sent");

        // Datagrams carrying another ID are dropped; the deadline covers them all.
        let query_id = message_bytes.get(..2);
        let deadline = tokio::time::Instant::now() + timeout;
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = loop {
            let len = tokio::time::timeout_at(deadline, socket.recv(&mut recv_buf))
                .await
                .map_err(|_| timeout_error(server))?
                .map_err(|e| map_io_error(server, "Failed to receive UDP response from", e))?;

            match query_id {
                Some(id) if !recv_buf[..len].starts_with(id) => {
                    debug!(server = %server, bytes_received = len, "Discarding UDP reply with mismatched ID");
                }
                _ => break len,
            }
        };

        recv_buf.truncate(bytes_received);

        debug!(server = %server, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_creation() {
        let addr: SocketAddr = "8.8.8.8:53".parse().unwrap();
        let transport = UdpTransport::new(addr);
        assert_eq!(transport.server_addr, addr);
        assert_eq!(transport.protocol_name(), "UDP");
        assert!(transport.bind_addr().is_ipv4());
    }

    #[test]
    fn test_udp_transport_ipv6_binds_ipv6() {
        let addr: SocketAddr = "[2001:4860:4860::8888]:53".parse().unwrap();
        let transport = UdpTransport::new(addr);
        assert!(transport.bind_addr().is_ipv6());
    }

    #[tokio::test]
    async fn test_udp_echo_roundtrip() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(&buf[..len], peer).await.unwrap();
        });

        let transport = UdpTransport::new(server_addr);
        let response = transport
            .send(b"\x12\x34hello", Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(response.bytes, b"\x12\x34hello");
        assert_eq!(response.protocol_used, "UDP");
    }

    #[tokio::test]
    async fn test_udp_skips_reply_with_other_id() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(b"\x99\x99stray", peer).await.unwrap();
            server.send_to(&buf[..len], peer).await.unwrap();
        });

        let transport = UdpTransport::new(server_addr);
        let response = transport
            .send(b"\x12\x34hello", Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(response.bytes, b"\x12\x34hello");
    }

    #[tokio::test]
    async fn test_udp_only_other_ids_times_out() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(b"\x99\x99stray", peer).await.unwrap();
        });

        let transport = UdpTransport::new(server_addr);
        let result = transport
            .send(b"\x12\x34hello", Duration::from_millis(200))
            .await;

        assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
    }

    #[tokio::test]
    async fn test_udp_silent_server_times_out() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        let transport = UdpTransport::new(server_addr);
        let result = transport.send(b"query", Duration::from_millis(100)).await;

        assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
        drop(server);
    }
}
