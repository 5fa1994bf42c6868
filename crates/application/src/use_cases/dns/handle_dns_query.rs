use crate::ports::{DnsResolver, ResolutionResult};
use ferrous_dyndns_domain::{DnsRequest, DomainError};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, request: &DnsRequest) -> Result<ResolutionResult, DomainError> {
        let start = Instant::now();
        let query = request.to_query();

        let result = self.resolver.resolve(&query).await;
        let response_time_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(resolution) => {
                let response_status = if resolution.is_nodata() {
                    "NODATA"
                } else {
                    "NOERROR"
                };
                info!(
                    domain = %request.domain,
                    record_type = %request.record_type,
                    client = %request.client_ip,
                    answers = resolution.answers.len(),
                    upstream = resolution.upstream_server.as_deref().unwrap_or("local"),
                    response_time_us,
                    status = response_status,
                    "Query resolved"
                );
            }
            Err(e) => {
                info!(
                    domain = %request.domain,
                    record_type = %request.record_type,
                    client = %request.client_ip,
                    response_time_us,
                    status = e.status(),
                    error = %e,
                    "Query not resolved"
                );
            }
        }

        result
    }
}
