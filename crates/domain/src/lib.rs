//! Ferrous DynDNS Domain Layer
pub mod config;
pub mod dns_name;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError, DynamicConfig, FallbackConfig};
pub use dns_name::{first_label, labels_of};
pub use dns_protocol::DnsProtocol;
pub use dns_query::DnsQuery;
pub use dns_record::{DnsClass, RecordType};
pub use dns_request::DnsRequest;
pub use errors::DomainError;
