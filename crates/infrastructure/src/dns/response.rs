//! Builds wire responses for a parsed request.

use super::record_mapper::RecordMapper;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use rqlite_dns_domain::{Answer, DomainError, ResponseStatus};
use tracing::warn;

/// Largest UDP payload sent to clients that did not negotiate more.
pub const MAX_UDP_PAYLOAD: usize = 512;

const HEADER_LEN: usize = 12;

pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn response_code(status: ResponseStatus) -> ResponseCode {
        match status {
            ResponseStatus::NoError => ResponseCode::NoError,
            ResponseStatus::NxDomain => ResponseCode::NXDomain,
            ResponseStatus::ServFail => ResponseCode::ServFail,
            ResponseStatus::NotImp => ResponseCode::NotImp,
            ResponseStatus::Refused => ResponseCode::Refused,
        }
    }

    /// Header and question of `request`, as a response with `code`.
    pub fn empty(request: &Message, code: ResponseCode) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(false);
        response.set_response_code(code);
        for query in request.queries() {
            response.add_query(query.clone());
        }
        response
    }

    /// Full response for a resolved answer.
    ///
    /// Records that cannot be encoded are dropped with a warning; the rest of
    /// the answer still goes out.
    pub fn from_answer(request: &Message, answer: &Answer) -> Message {
        let mut response = Self::empty(request, Self::response_code(answer.status));
        response.set_authoritative(answer.authoritative);

        for record in &answer.answers {
            match RecordMapper::to_hickory(record) {
                Ok(r) => {
                    response.add_answer(r);
                }
                Err(e) => warn!(name = %record.name, error = %e, "Dropping unencodable answer"),
            }
        }
        for record in &answer.authority {
            match RecordMapper::to_hickory(record) {
                Ok(r) => {
                    response.add_name_server(r);
                }
                Err(e) => warn!(name = %record.name, error = %e, "Dropping unencodable authority"),
            }
        }
        for record in &answer.additional {
            match RecordMapper::to_hickory(record) {
                Ok(r) => {
                    response.add_additional(r);
                }
                Err(e) => warn!(name = %record.name, error = %e, "Dropping unencodable additional"),
            }
        }

        response
    }

    /// FORMERR for input whose header could be read but whose body could not.
    ///
    /// Returns `None` when not even the header is present.
    pub fn format_error_from_raw(raw: &[u8]) -> Option<Vec<u8>> {
        if raw.len() < HEADER_LEN {
            return None;
        }
        // Never answer something that already claims to be a response.
        if raw[2] & 0x80 != 0 {
            return None;
        }
        let id = u16::from_be_bytes([raw[0], raw[1]]);
        let mut response = Message::new(id, MessageType::Response, OpCode::Query);
        response.set_recursion_desired(raw[2] & 0x01 != 0);
        response.set_response_code(ResponseCode::FormErr);
        Self::serialize(&response).ok()
    }

    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(MAX_UDP_PAYLOAD);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;
        Ok(buf)
    }

    /// Serializes for UDP; oversized responses become header plus question with TC set.
    pub fn serialize_for_udp(message: &Message) -> Result<Vec<u8>, DomainError> {
        let bytes = Self::serialize(message)?;
        if bytes.len() <= MAX_UDP_PAYLOAD {
            return Ok(bytes);
        }

        let mut truncated = Message::new(message.id(), MessageType::Response, message.op_code());
        truncated.set_recursion_desired(message.recursion_desired());
        truncated.set_authoritative(message.authoritative());
        truncated.set_response_code(message.response_code());
        truncated.set_truncated(true);
        for query in message.queries() {
            truncated.add_query(query.clone());
        }
        Self::serialize(&truncated)
    }
}
