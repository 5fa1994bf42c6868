use async_trait::async_trait;
use ferrous_dyndns_application::ports::{DnsResolver, ResolutionResult};
use ferrous_dyndns_domain::dns_name::{first_label, label_starts_with};
use ferrous_dyndns_domain::{DnsQuery, DomainError, DynamicConfig, RecordType};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use std::net::Ipv4Addr;
use tracing::debug;

/// Answers `A` queries for `{pattern}{N}.*` with `{network_prefix}.{N}`.
///
/// Answers carry TTL 0 so downstream caches never keep them.
pub struct DynamicResolver {
    pattern: String,
    prefix: [u8; 3],
}

impl DynamicResolver {
    pub fn new(pattern: &str, network_prefix: &str) -> Result<Self, DomainError> {
        let octets: Vec<u8> = network_prefix
            .split('.')
            .map(|part| part.parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| {
                DomainError::ConfigError(format!("Invalid network prefix '{}'", network_prefix))
            })?;

        let prefix: [u8; 3] = octets.try_into().map_err(|_| {
            DomainError::ConfigError(format!(
                "Network prefix '{}' must have exactly three octets",
                network_prefix
            ))
        })?;

        if pattern.is_empty() {
            return Err(DomainError::ConfigError(
                "Dynamic pattern must not be empty".to_string(),
            ));
        }

        Ok(Self {
            pattern: pattern.to_ascii_lowercase(),
            prefix,
        })
    }

    pub fn from_config(config: &DynamicConfig) -> Result<Self, DomainError> {
        Self::new(&config.pattern, &config.network_prefix)
    }

    /// `true` for `A` queries whose first label starts with the pattern.
    /// The suffix is not inspected here.
    pub fn matches(&self, query: &DnsQuery) -> bool {
        if query.record_type != RecordType::A {
            return false;
        }
        match first_label(&query.domain) {
            Ok(Some(label)) => label_starts_with(label, &self.pattern),
            _ => false,
        }
    }

    fn suffix_of(&self, query: &DnsQuery) -> Result<u8, DomainError> {
        let label = first_label(&query.domain)?.ok_or(DomainError::NotAuthoritative)?;
        let digits = &label[self.pattern.len()..];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidSuffix(format!(
                "'{}' has no numeric suffix after '{}'",
                label, self.pattern
            )));
        }

        let significant = digits.trim_start_matches('0');
        if significant.len() > 3 {
            return Err(DomainError::InvalidSuffix(format!(
                "{} does not fit in an address octet",
                digits
            )));
        }
        let value: u16 = if significant.is_empty() {
            0
        } else {
            significant
                .parse()
                .map_err(|_| DomainError::InvalidSuffix(format!("'{}' is not a number", digits)))?
        };

        u8::try_from(value).map_err(|_| {
            DomainError::InvalidSuffix(format!("{} does not fit in an address octet", value))
        })
    }

    pub fn address_for(&self, suffix: u8) -> Ipv4Addr {
        Ipv4Addr::new(self.prefix[0], self.prefix[1], self.prefix[2], suffix)
    }
}

#[async_trait]
impl DnsResolver for DynamicResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        if !self.matches(query) {
            return Err(DomainError::NotAuthoritative);
        }

        let suffix = self.suffix_of(query)?;
        let address = self.address_for(suffix);

        let mut name = Name::from_ascii(query.domain.as_ref())
            .map_err(|e| DomainError::MalformedName(format!("{}: {}", query.domain, e)))?;
        name.set_fqdn(true);

        let mut record = Record::from_rdata(name, 0, RData::A(A(address)));
        record.set_dns_class(DNSClass::IN);

        debug!(domain = %query.domain, address = %address, "Dynamic answer synthesized");

        Ok(ResolutionResult::new(vec![record]))
    }

    fn name(&self) -> &'static str {
        "dynamic"
    }
}
