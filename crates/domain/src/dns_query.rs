use super::{DnsClass, RecordType};
use std::fmt;
use std::sync::Arc;

/// A single question as seen by resolvers. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub class: DnsClass,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            class: DnsClass::IN,
        }
    }

    pub fn with_class(mut self, class: DnsClass) -> Self {
        self.class = class;
        self
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.domain, self.class, self.record_type)
    }
}
