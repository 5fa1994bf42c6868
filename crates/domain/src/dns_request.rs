use super::{DnsClass, DnsQuery, RecordType};
use std::net::IpAddr;
use std::sync::Arc;

/// An incoming question together with who asked it.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub class: DnsClass,
    pub client_ip: IpAddr,
}

impl DnsRequest {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType, client_ip: IpAddr) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            class: DnsClass::IN,
            client_ip,
        }
    }

    pub fn with_class(mut self, class: DnsClass) -> Self {
        self.class = class;
        self
    }

    pub fn to_query(&self) -> DnsQuery {
        DnsQuery::new(Arc::clone(&self.domain), self.record_type).with_class(self.class)
    }
}
