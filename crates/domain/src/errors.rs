use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Resolver is not authoritative for this query")]
    NotAuthoritative,

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Malformed domain name: {0}")]
    MalformedName(String),

    #[error("Invalid dynamic suffix: {0}")]
    InvalidSuffix(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("No healthy upstream servers available")]
    TransportNoHealthyServers,

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// `true` when the resolver that produced this error simply does not
    /// answer for the query, so the next resolver in a chain may try.
    pub fn is_declined(&self) -> bool {
        matches!(
            self,
            DomainError::NotAuthoritative
                | DomainError::NxDomain
                | DomainError::MalformedName(_)
                | DomainError::InvalidSuffix(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout | DomainError::TransportTimeout { .. }
        )
    }

    /// Short status label used in query logs.
    pub fn status(&self) -> &'static str {
        if self.is_declined() {
            "NXDOMAIN"
        } else if self.is_timeout() {
            "TIMEOUT"
        } else if matches!(self, DomainError::TransportConnectionRefused { .. }) {
            "REFUSED"
        } else {
            "SERVFAIL"
        }
    }
}
