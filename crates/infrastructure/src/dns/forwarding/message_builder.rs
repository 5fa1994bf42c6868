//! Builds recursive query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_dyndns_domain::{DnsQuery, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub struct MessageBuilder;

impl MessageBuilder {
    /// Serializes `query` as a single-question message with a random ID and
    /// the RD flag set. Returns the ID so the response can be matched.
    pub fn build_query_with_id(query: &DnsQuery) -> Result<(u16, Vec<u8>), DomainError> {
        let mut name = Name::from_ascii(query.domain.as_ref()).map_err(|e| {
            DomainError::MalformedName(format!("Invalid domain '{}': {}", query.domain, e))
        })?;
        name.set_fqdn(true);

        let mut question = Query::query(name, RecordTypeMapper::to_hickory(&query.record_type));
        question.set_query_class(RecordTypeMapper::class_to_hickory(&query.class));

        let id = fastrand::u16(..);

        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        message.add_query(question);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::MalformedName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
