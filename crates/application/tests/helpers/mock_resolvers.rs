#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_dyndns_application::ports::{DnsResolver, ResolutionResult};
use ferrous_dyndns_domain::{DnsQuery, DomainError};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Scripted resolver that counts how often it was asked.
///
/// Domains without a scripted outcome get `default_outcome`, which starts as
/// a decline (`NotAuthoritative`).
pub struct MockDnsResolver {
    name: &'static str,
    responses: RwLock<HashMap<String, Result<ResolutionResult, DomainError>>>,
    default_outcome: RwLock<Result<ResolutionResult, DomainError>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockDnsResolver {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: RwLock::new(HashMap::new()),
            default_outcome: RwLock::new(Err(DomainError::NotAuthoritative)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_response(&self, domain: &str, resolution: ResolutionResult) {
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), Ok(resolution));
    }

    pub fn set_error(&self, domain: &str, error: DomainError) {
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), Err(error));
    }

    pub fn set_default(&self, outcome: Result<ResolutionResult, DomainError>) {
        *self.default_outcome.write().unwrap() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .responses
            .read()
            .unwrap()
            .get(query.domain.as_ref())
            .cloned();

        match scripted {
            Some(outcome) => outcome,
            None => self.default_outcome.read().unwrap().clone(),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

pub fn a_record(name: &str, ip: Ipv4Addr, ttl: u32) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), ttl, RData::A(A(ip)))
}

pub fn a_resolution(name: &str, ip: [u8; 4]) -> ResolutionResult {
    ResolutionResult::new(vec![a_record(name, Ipv4Addr::from(ip), 300)])
}
