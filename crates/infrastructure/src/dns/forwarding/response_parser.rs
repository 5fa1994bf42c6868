use ferrous_dyndns_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answers: Vec<Record>,

    pub authority: Vec<Record>,

    pub additional: Vec<Record>,
}

impl DnsResponse {
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Received a query where a response was expected".to_string(),
            ));
        }

        let response = DnsResponse {
            id: message.id(),
            rcode: message.response_code(),
            truncated: message.truncated(),
            answers: message.answers().to_vec(),
            authority: message.name_servers().to_vec(),
            additional: message
                .additionals()
                .iter()
                .filter(|r| r.record_type() != hickory_proto::rr::RecordType::OPT)
                .cloned()
                .collect(),
        };

        debug!(
            rcode = ?response.rcode,
            answers = response.answers.len(),
            authority = response.authority.len(),
            additional = response.additional.len(),
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    /// Parses `response_bytes` and rejects it unless its ID is `expected_id`.
    pub fn parse_matching(response_bytes: &[u8], expected_id: u16) -> Result<DnsResponse, DomainError> {
        let response = Self::parse(response_bytes)?;
        if response.id != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                response.id, expected_id
            )));
        }
        Ok(response)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
