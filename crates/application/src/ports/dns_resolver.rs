use async_trait::async_trait;
use ferrous_dyndns_domain::{DnsQuery, DomainError};
use hickory_proto::rr::Record;

/// Successful answer to a query: the three record sections of a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult {
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
    /// Upstream that produced the answer, `None` for locally synthesized ones.
    pub upstream_server: Option<String>,
}

impl ResolutionResult {
    pub fn new(answers: Vec<Record>) -> Self {
        Self {
            answers,
            ..Default::default()
        }
    }

    pub fn with_sections(
        answers: Vec<Record>,
        authority: Vec<Record>,
        additional: Vec<Record>,
    ) -> Self {
        Self {
            answers,
            authority,
            additional,
            upstream_server: None,
        }
    }

    pub fn with_upstream(mut self, server: impl Into<String>) -> Self {
        self.upstream_server = Some(server.into());
        self
    }

    /// NODATA: the name exists but has nothing of the requested type.
    pub fn is_nodata(&self) -> bool {
        self.answers.is_empty()
    }
}

/// A resolution strategy.
///
/// Implementations return an error for which `is_declined()` holds when they
/// are not authoritative for the query; any other error is a real failure.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "resolver"
    }
}
