use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport;
use ferrous_dyndns_domain::{DnsProtocol, DnsQuery, DomainError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a single-server query attempt
pub struct QueryAttemptResult {
    pub response: DnsResponse,
    pub server: DnsProtocol,
    pub latency_ms: u64,
}

/// Sends `query` to one upstream and parses the reply.
///
/// A truncated UDP reply is retried once over TCP against the same address,
/// within whatever is left of `timeout`. Replies whose ID differs from the
/// query's are rejected.
pub async fn query_server(
    protocol: &DnsProtocol,
    query: &DnsQuery,
    timeout: Duration,
) -> Result<QueryAttemptResult, DomainError> {
    let start = Instant::now();

    let (id, query_bytes) = MessageBuilder::build_query_with_id(query)?;

    let dns_transport = transport::create_transport(protocol);
    debug!(server = %protocol, transport = dns_transport.protocol_name(), domain = %query.domain, "Querying upstream");
    let transport_response = dns_transport.send(&query_bytes, timeout).await?;
    let dns_response = ResponseParser::parse_matching(&transport_response.bytes, id)?;

    if dns_response.truncated {
        if let DnsProtocol::Udp { addr } = protocol {
            debug!(server = %addr, "Response truncated (TC bit), retrying via TCP");

            let tcp_protocol = DnsProtocol::Tcp { addr: *addr };
            let remaining = timeout
                .checked_sub(start.elapsed())
                .unwrap_or(Duration::from_millis(500));

            let tcp_response = transport::create_transport(&tcp_protocol)
                .send(&query_bytes, remaining)
                .await?;
            let tcp_dns_response = ResponseParser::parse_matching(&tcp_response.bytes, id)?;

            return Ok(QueryAttemptResult {
                response: tcp_dns_response,
                server: tcp_protocol,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }
    }

    Ok(QueryAttemptResult {
        response: dns_response,
        server: *protocol,
        latency_ms: start.elapsed().as_millis() as u64,
    })
}
