#![allow(dead_code)]
use ferrous_dyndns_application::ports::DnsResolver;
use ferrous_dyndns_application::services::ResolverChain;
use ferrous_dyndns_application::use_cases::HandleDnsQueryUseCase;
use ferrous_dyndns_infrastructure::dns::{
    DnsServer, DnsServerHandler, DynamicResolver, FallbackResolver, UpstreamSettings,
};
use ferrous_dyndns_domain::DnsProtocol;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

pub fn query_message(name: &str, record_type: RecordType, id: u16) -> Vec<u8> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_ascii(name).unwrap(), record_type));
    encode(&message)
}

pub fn encode(message: &Message) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

/// Minimal stub client used to talk to a running [`DnsServer`].
pub struct DnsClient;

impl DnsClient {
    pub async fn udp(server: SocketAddr, query: &[u8]) -> Message {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        socket.send_to(query, server).await.unwrap();

        let mut buf = vec![0u8; 4096];
        let (len, _) = tokio::time::timeout(Duration::from_secs(5), socket.recv_from(&mut buf))
            .await
            .expect("no UDP response")
            .unwrap();
        Message::from_vec(&buf[..len]).unwrap()
    }

    pub async fn tcp(server: SocketAddr, query: &[u8]) -> Message {
        let mut stream = TcpStream::connect(server).await.unwrap();
        stream
            .write_all(&(query.len() as u16).to_be_bytes())
            .await
            .unwrap();
        stream.write_all(query).await.unwrap();

        let read = async {
            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await.unwrap();
            let mut body = vec![0u8; u16::from_be_bytes(len_buf) as usize];
            stream.read_exact(&mut body).await.unwrap();
            body
        };
        let body = tokio::time::timeout(Duration::from_secs(5), read)
            .await
            .expect("no TCP response");
        Message::from_vec(&body).unwrap()
    }
}

pub fn upstream_settings(servers: &[SocketAddr], timeout: Duration, attempts: u32) -> UpstreamSettings {
    UpstreamSettings::new(
        servers.iter().copied().map(DnsProtocol::udp).collect(),
        timeout,
        attempts,
    )
}

/// Binds a full dynamic + fallback server on an ephemeral localhost port.
pub async fn start_server(
    upstream: UpstreamSettings,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let resolvers: Vec<Arc<dyn DnsResolver>> = vec![
        Arc::new(DynamicResolver::new("workstation", "172.0.2").unwrap()),
        Arc::new(FallbackResolver::new(upstream)),
    ];
    let chain = ResolverChain::new(resolvers);
    let use_case = Arc::new(HandleDnsQueryUseCase::new(Arc::new(chain)));

    let server = DnsServer::bind(
        "127.0.0.1:0".parse().unwrap(),
        DnsServerHandler::new(use_case),
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    let addr = server.local_addr();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run_until(async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });

    (addr, tx, handle)
}
