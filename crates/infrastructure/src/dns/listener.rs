use super::server::DnsServerHandler;
use ferrous_dyndns_domain::DomainError;
use hickory_server::ServerFuture;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

/// A DNS server bound to one UDP socket and one TCP listener on the same
/// address and port.
///
/// Binding and serving are separate steps so callers can learn the actual
/// port (e.g. after binding port 0) before queries start flowing.
pub struct DnsServer {
    handler: DnsServerHandler,
    udp: UdpSocket,
    tcp: TcpListener,
    local_addr: SocketAddr,
    tcp_timeout: Duration,
}

impl DnsServer {
    pub async fn bind(
        addr: SocketAddr,
        handler: DnsServerHandler,
        tcp_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let udp = create_udp_socket(addr).map_err(|e| bind_error("UDP", addr, e))?;
        let local_addr = udp.local_addr().map_err(|e| bind_error("UDP", addr, e))?;

        // Port 0 resolves on the UDP bind; TCP follows whatever UDP got.
        let tcp = create_tcp_listener(local_addr).map_err(|e| bind_error("TCP", local_addr, e))?;

        info!(bind_address = %local_addr, "DNS server bound (UDP + TCP)");

        Ok(Self {
            handler,
            udp,
            tcp,
            local_addr,
            tcp_timeout,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves queries until `shutdown` completes, then drains in-flight
    /// requests and returns.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), DomainError>
    where
        F: Future<Output = ()>,
    {
        let local_addr = self.local_addr;
        let mut server = ServerFuture::new(self.handler);
        server.register_socket(self.udp);
        server.register_listener(self.tcp, self.tcp_timeout);

        info!(bind_address = %local_addr, "DNS server ready");

        let finished = tokio::select! {
            result = server.block_until_done() => Some(result),
            _ = shutdown => None,
        };

        match finished {
            Some(result) => result.map_err(|e| DomainError::IoError(format!("DNS server stopped: {}", e))),
            None => {
                info!(bind_address = %local_addr, "Shutting down DNS server");
                server
                    .shutdown_gracefully()
                    .await
                    .map_err(|e| DomainError::IoError(format!("DNS server shutdown failed: {}", e)))
            }
        }
    }
}

fn bind_error(protocol: &str, addr: SocketAddr, e: io::Error) -> DomainError {
    DomainError::IoError(format!("Failed to bind {} {}: {}", protocol, addr, e))
}

fn socket_domain(addr: SocketAddr) -> Domain {
    if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    }
}

fn create_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(socket_domain(addr), Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

fn create_tcp_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(socket_domain(addr), Type::STREAM, Some(Protocol::TCP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
