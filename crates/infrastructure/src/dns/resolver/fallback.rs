use crate::dns::forwarding::ResponseParser;
use crate::dns::load_balancer::{FailoverStrategy, QueryAttemptResult};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use ferrous_dyndns_application::ports::{DnsResolver, ResolutionResult};
use ferrous_dyndns_domain::{DnsProtocol, DnsQuery, DomainError, FallbackConfig};
use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Upstream servers plus the timing knobs used to query them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub servers: Vec<DnsProtocol>,
    /// Per-server, per-attempt timeout.
    pub timeout: Duration,
    /// Rounds over `servers` before giving up.
    pub attempts: u32,
}

impl UpstreamSettings {
    pub fn new(servers: Vec<DnsProtocol>, timeout: Duration, attempts: u32) -> Self {
        Self {
            servers,
            timeout,
            attempts: attempts.max(1),
        }
    }

    pub fn from_config(config: &FallbackConfig, servers: Vec<DnsProtocol>) -> Self {
        Self::new(
            servers,
            Duration::from_secs(config.query_timeout),
            config.attempts,
        )
    }
}

/// Forwards every query to the configured upstream nameservers.
///
/// NXDOMAIN from upstream declines so an outer chain may keep going; timeouts
/// and server failures do not.
pub struct FallbackResolver {
    settings: Arc<ArcSwap<UpstreamSettings>>,
    strategy: FailoverStrategy,
}

impl FallbackResolver {
    pub fn new(settings: UpstreamSettings) -> Self {
        Self::with_shared_settings(Arc::new(ArcSwap::from_pointee(settings)))
    }

    /// Builds a resolver reading from `settings`, which may be swapped by a
    /// reload job while queries are in flight.
    pub fn with_shared_settings(settings: Arc<ArcSwap<UpstreamSettings>>) -> Self {
        let current = settings.load();
        info!(
            servers = current.servers.len(),
            timeout_ms = current.timeout.as_millis() as u64,
            attempts = current.attempts,
            "Fallback resolver created"
        );

        Self {
            settings,
            strategy: FailoverStrategy::new(),
        }
    }

    pub fn settings_handle(&self) -> Arc<ArcSwap<UpstreamSettings>> {
        Arc::clone(&self.settings)
    }

    fn into_resolution(attempt: QueryAttemptResult) -> Result<ResolutionResult, DomainError> {
        let response = attempt.response;
        match response.rcode {
            ResponseCode::NoError => Ok(ResolutionResult::with_sections(
                response.answers,
                response.authority,
                response.additional,
            )
            .with_upstream(attempt.server.to_string())),
            ResponseCode::NXDomain => Err(DomainError::NxDomain),
            other => Err(DomainError::UpstreamFailure(format!(
                "{} replied {}",
                attempt.server,
                ResponseParser::rcode_to_status(other)
            ))),
        }
    }
}

#[async_trait]
impl DnsResolver for FallbackResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        let settings = self.settings.load_full();
        let mut last_error = DomainError::TransportNoHealthyServers;

        for attempt in 1..=settings.attempts {
            debug!(
                domain = %query.domain,
                record_type = %query.record_type,
                attempt,
                "Forwarding query upstream"
            );

            match self
                .strategy
                .query(&settings.servers, query, settings.timeout)
                .await
            {
                Ok(reply) if reply.response.is_server_error() && attempt < settings.attempts => {
                    if let Err(e) = Self::into_resolution(reply) {
                        last_error = e;
                    }
                }
                Ok(reply) => return Self::into_resolution(reply),
                Err(DomainError::TransportNoHealthyServers) => {
                    return Err(DomainError::TransportNoHealthyServers)
                }
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
