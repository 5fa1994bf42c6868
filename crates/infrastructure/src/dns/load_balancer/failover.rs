use super::query::{query_server, QueryAttemptResult};
use ferrous_dyndns_domain::{DnsProtocol, DnsQuery, DomainError};
use std::time::Duration;
use tracing::{debug, warn};

/// Tries upstreams one at a time, in configuration order.
///
/// A reply with NOERROR or NXDOMAIN ends the walk. SERVFAIL, REFUSED and
/// NOTIMP replies and transport failures move on to the next server.
pub struct FailoverStrategy;

impl FailoverStrategy {
    pub fn new() -> Self {
        Self
    }

    pub async fn query(
        &self,
        servers: &[DnsProtocol],
        query: &DnsQuery,
        timeout: Duration,
    ) -> Result<QueryAttemptResult, DomainError> {
        if servers.is_empty() {
            return Err(DomainError::TransportNoHealthyServers);
        }
        debug!(strategy = "failover", servers = servers.len(), domain = %query.domain, "Trying sequentially");

        let mut last_server_error: Option<QueryAttemptResult> = None;
        let mut timeouts = 0usize;

        for (index, protocol) in servers.iter().enumerate() {
            match query_server(protocol, query, timeout).await {
                Ok(r) if r.response.is_server_error() => {
                    warn!(server = %protocol, rcode = ?r.response.rcode, position = index, "Server error reply, failing over");
                    last_server_error = Some(r);
                }
                Ok(r) => {
                    debug!(server = %r.server, latency_ms = r.latency_ms, position = index, "Server responded");
                    return Ok(r);
                }
                Err(e) => {
                    if e.is_timeout() {
                        timeouts += 1;
                    }
                    warn!(server = %protocol, error = %e, position = index, "Failing over");
                }
            }
        }

        if let Some(reply) = last_server_error {
            return Ok(reply);
        }
        if timeouts == servers.len() {
            return Err(DomainError::QueryTimeout);
        }
        Err(DomainError::TransportAllServersUnreachable)
    }
}

impl Default for FailoverStrategy {
    fn default() -> Self {
        Self::new()
    }
}
