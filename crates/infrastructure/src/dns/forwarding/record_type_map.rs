//! Mapping between the domain's record type / class and hickory's.
//!
//! Both sides can represent any 16-bit code, so the conversion is lossless in
//! either direction.

use ferrous_dyndns_domain::{DnsClass, RecordType};
use hickory_proto::rr::{DNSClass, RecordType as HickoryRecordType};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(hickory_type))
    }

    pub fn class_to_hickory(class: &DnsClass) -> DNSClass {
        match class {
            DnsClass::IN => DNSClass::IN,
            DnsClass::CH => DNSClass::CH,
            DnsClass::HS => DNSClass::HS,
            DnsClass::NONE => DNSClass::NONE,
            DnsClass::ANY => DNSClass::ANY,
            DnsClass::Unknown(code) => DNSClass::Unknown(*code),
        }
    }

    pub fn class_from_hickory(class: DNSClass) -> DnsClass {
        match class {
            DNSClass::IN => DnsClass::IN,
            DNSClass::CH => DnsClass::CH,
            DNSClass::HS => DnsClass::HS,
            DNSClass::NONE => DnsClass::NONE,
            DNSClass::ANY => DnsClass::ANY,
            DNSClass::OPT(size) => DnsClass::Unknown(size),
            DNSClass::Unknown(code) => DnsClass::Unknown(code),
        }
    }
}
