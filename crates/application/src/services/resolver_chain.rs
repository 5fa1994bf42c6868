use crate::ports::{DnsResolver, ResolutionResult};
use async_trait::async_trait;
use ferrous_dyndns_domain::{DnsQuery, DomainError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered list of resolvers consulted one after another.
///
/// The first resolver that answers wins and the rest are never called. A
/// resolver that declines (see [`DomainError::is_declined`]) hands the query
/// to the next one; any other failure ends the dispatch with that error.
/// When every resolver declines the chain itself declines with
/// [`DomainError::NotAuthoritative`].
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn DnsResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Arc<dyn DnsResolver>>) -> Self {
        Self { resolvers }
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub async fn dispatch(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        for (position, resolver) in self.resolvers.iter().enumerate() {
            match resolver.resolve(query).await {
                Ok(result) => {
                    debug!(
                        domain = %query.domain,
                        record_type = %query.record_type,
                        resolver = resolver.name(),
                        position,
                        answers = result.answers.len(),
                        "Query answered"
                    );
                    return Ok(result);
                }
                Err(e) if e.is_declined() => {
                    debug!(
                        domain = %query.domain,
                        record_type = %query.record_type,
                        resolver = resolver.name(),
                        reason = %e,
                        "Resolver declined, trying next"
                    );
                }
                Err(e) => {
                    warn!(
                        domain = %query.domain,
                        record_type = %query.record_type,
                        resolver = resolver.name(),
                        error = %e,
                        "Resolver failed"
                    );
                    return Err(e);
                }
            }
        }

        Err(DomainError::NotAuthoritative)
    }
}

#[async_trait]
impl DnsResolver for ResolverChain {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        self.dispatch(query).await
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
