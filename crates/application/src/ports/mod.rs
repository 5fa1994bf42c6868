mod dns_resolver;

pub use dns_resolver::{DnsResolver, ResolutionResult};

// Re-export for convenience
pub use ferrous_dyndns_domain::DnsQuery;
