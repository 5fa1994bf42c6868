mod helpers;

use helpers::builders::{encode, query_message, start_server, upstream_settings, DnsClient};
use helpers::dns_server_mock::{MockBehavior, MockDnsServer};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{RData, RecordType};
use std::net::Ipv4Addr;
use std::time::Duration;

fn answer_ipv4(response: &Message) -> Ipv4Addr {
    match response.answers()[0].data() {
        RData::A(a) => a.0,
        other => panic!("expected A record, got {:?}", other),
    }
}

// ── dynamic answers ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dynamic_answer_over_udp() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::udp(addr, &query_message("workstation1.example.com.", RecordType::A, 0x1111)).await;

    assert_eq!(response.id(), 0x1111);
    assert_eq!(response.message_type(), MessageType::Response);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 1);
    assert_eq!(answer_ipv4(&response), Ipv4Addr::new(172, 0, 2, 1));
    assert_eq!(response.answers()[0].ttl(), 0);
    assert_eq!(upstream.udp_queries(), 0, "fallback must not be consulted");

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_dynamic_answer_over_tcp() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::tcp(addr, &query_message("workstation42.example.com.", RecordType::A, 0x2222)).await;

    assert_eq!(response.id(), 0x2222);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(answer_ipv4(&response), Ipv4Addr::new(172, 0, 2, 42));
    assert_eq!(response.answers()[0].ttl(), 0);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_answer_name_keeps_query_case() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::udp(addr, &query_message("WORKSTATION9.Example.com.", RecordType::A, 7)).await;

    assert_eq!(response.queries()[0].name().to_ascii(), "WORKSTATION9.Example.com.");
    assert_eq!(answer_ipv4(&response), Ipv4Addr::new(172, 0, 2, 9));
    assert_eq!(response.answers()[0].name().to_ascii(), "WORKSTATION9.Example.com.");

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

// ── fallback ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_matching_name_is_forwarded() {
    let upstream = MockDnsServer::start(MockBehavior::Answer(Ipv4Addr::new(93, 184, 216, 34)))
        .await
        .unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::udp(addr, &query_message("other.example.com.", RecordType::A, 3)).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(answer_ipv4(&response), Ipv4Addr::new(93, 184, 216, 34));
    assert!(response.recursion_available());
    assert_eq!(upstream.udp_queries(), 1);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_wrong_type_for_pattern_is_forwarded() {
    let upstream = MockDnsServer::start(MockBehavior::NoData).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::udp(addr, &query_message("workstation1.example.com.", RecordType::MX, 4)).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(response.answers().is_empty());
    assert_eq!(upstream.udp_queries(), 1);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_everyone_declines_is_nxdomain() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let response = DnsClient::udp(addr, &query_message("workstation.example.com.", RecordType::A, 5)).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    assert_eq!(upstream.udp_queries(), 1);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_upstream_timeout_is_servfail_not_nxdomain() {
    let upstream = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_millis(200), 1)).await;

    let response = DnsClient::tcp(addr, &query_message("slow.example.com.", RecordType::A, 6)).await;

    assert_eq!(response.response_code(), ResponseCode::ServFail);
    assert!(response.answers().is_empty());

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

// ── protocol errors ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unsupported_opcode_is_notimp() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let mut message = Message::from_vec(&query_message("workstation1.lan.", RecordType::A, 8)).unwrap();
    message.set_op_code(OpCode::Status);

    let response = DnsClient::udp(addr, &encode(&message)).await;

    assert_eq!(response.response_code(), ResponseCode::NotImp);
    assert_eq!(upstream.udp_queries(), 0);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_server_survives_many_concurrent_queries() {
    let upstream = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (addr, shutdown, handle) =
        start_server(upstream_settings(&[upstream.addr()], Duration::from_secs(1), 1)).await;

    let mut tasks = Vec::new();
    for n in 1..=20u16 {
        tasks.push(tokio::spawn(async move {
            let name = format!("workstation{}.lan.", n);
            let response = DnsClient::udp(addr, &query_message(&name, RecordType::A, n)).await;
            (n, answer_ipv4(&response))
        }));
    }

    for task in tasks {
        let (n, ip) = task.await.unwrap();
        assert_eq!(ip, Ipv4Addr::new(172, 0, 2, n as u8));
    }

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}
