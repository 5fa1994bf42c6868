#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// What the mock upstream does with each query.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// NOERROR with one A record, TTL 60.
    Answer(Ipv4Addr),
    /// NOERROR without records.
    NoData,
    NxDomain,
    ServFail,
    /// Never replies.
    Silent,
    /// Over UDP: NOERROR with TC set and no records. Over TCP: like `Answer`.
    Truncated(Ipv4Addr),
    /// Replies with the query ID plus one, which a client must reject.
    WrongId(Ipv4Addr),
    /// Over UDP: a `WrongId` reply followed by the real answer. Over TCP: like `Answer`.
    StrayThenAnswer(Ipv4Addr),
}

/// Upstream nameserver on 127.0.0.1 serving UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let MockBehavior::StrayThenAnswer(ip) = behavior {
                                if let Some(stray) = build_response(&buf[..len], MockBehavior::WrongId(ip), false) {
                                    let _ = socket.send_to(&stray, peer).await;
                                }
                            }
                            if let Some(response) = build_response(&buf[..len], behavior, false) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let tcp_count = Arc::clone(&tcp_count);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                tcp_count.fetch_add(1, Ordering::SeqCst);
                                if let Some(response) = build_response(&query, behavior, true) {
                                    let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                                    let _ = stream.write_all(&response).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(query: &[u8], behavior: MockBehavior, over_tcp: bool) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;

    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true);
    response.add_queries(request.queries().to_vec());

    let question_name = request.queries().first()?.name().clone();
    let answer = |ip: Ipv4Addr| Record::from_rdata(question_name.clone(), 60, RData::A(A(ip)));

    match behavior {
        MockBehavior::Answer(ip) | MockBehavior::StrayThenAnswer(ip) => {
            response.add_answer(answer(ip));
        }
        MockBehavior::NoData => {}
        MockBehavior::NxDomain => {
            response.set_response_code(ResponseCode::NXDomain);
        }
        MockBehavior::ServFail => {
            response.set_response_code(ResponseCode::ServFail);
        }
        MockBehavior::Silent => return None,
        MockBehavior::Truncated(ip) => {
            if over_tcp {
                response.add_answer(answer(ip));
            } else {
                response.set_truncated(true);
            }
        }
        MockBehavior::WrongId(ip) => {
            response.set_id(request.id().wrapping_add(1));
            response.add_answer(answer(ip));
        }
    }

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    response.emit(&mut encoder).ok()?;
    Some(buf)
}
