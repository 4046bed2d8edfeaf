use super::record_type_map::RecordTypeMapper;
use super::response::ResponseBuilder;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use rqlite_dns_application::ports::NextHandler;
use rqlite_dns_application::use_cases::ResolveQueryUseCase;
use rqlite_dns_domain::{QueryClass, Question, Resolution};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
        }
    }
}

/// Turns raw request bytes into raw response bytes.
///
/// Authoritative questions go through [`ResolveQueryUseCase`]; everything
/// else is handed to the next handler untouched.
pub struct DnsRequestHandler {
    use_case: Arc<ResolveQueryUseCase>,
    next: Arc<dyn NextHandler>,
    query_timeout: Duration,
}

impl DnsRequestHandler {
    pub fn new(
        use_case: Arc<ResolveQueryUseCase>,
        next: Arc<dyn NextHandler>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            use_case,
            next,
            query_timeout,
        }
    }

    pub async fn handle_udp(&self, raw: &[u8]) -> Option<Vec<u8>> {
        self.handle(raw, Protocol::Udp).await
    }

    pub async fn handle_tcp(&self, raw: &[u8]) -> Option<Vec<u8>> {
        self.handle(raw, Protocol::Tcp).await
    }

    /// Returns `None` when the input should be dropped without a reply.
    pub async fn handle(&self, raw: &[u8], protocol: Protocol) -> Option<Vec<u8>> {
        let request = match Message::from_vec(raw) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, protocol = protocol.as_str(), "Unparseable DNS message");
                return ResponseBuilder::format_error_from_raw(raw);
            }
        };

        if request.message_type() != MessageType::Query {
            return None;
        }

        if request.op_code() != OpCode::Query {
            debug!(op_code = ?request.op_code(), "Unsupported opcode");
            return self.encode(&ResponseBuilder::empty(&request, ResponseCode::NotImp), protocol);
        }

        let [query] = request.queries() else {
            debug!(count = request.queries().len(), "Expected exactly one question");
            return self.encode(&ResponseBuilder::empty(&request, ResponseCode::FormErr), protocol);
        };

        let question = Question::new(
            &query.name().to_ascii(),
            RecordTypeMapper::query_type(query.query_type()),
            QueryClass::from_u16(u16::from(query.query_class())),
        );

        let resolution =
            match tokio::time::timeout(self.query_timeout, self.use_case.execute(&question)).await
            {
                Ok(Ok(resolution)) => resolution,
                Ok(Err(e)) => {
                    error!(name = %question.name, qtype = %question.query_type, error = %e, "Resolution failed");
                    return self.server_failure(&request, protocol);
                }
                Err(_) => {
                    warn!(name = %question.name, qtype = %question.query_type, timeout_ms = self.query_timeout.as_millis() as u64, "Resolution timed out");
                    return self.server_failure(&request, protocol);
                }
            };

        match resolution {
            Resolution::Answer(answer) => {
                debug!(
                    name = %question.name,
                    qtype = %question.query_type,
                    status = answer.status.as_str(),
                    answers = answer.answers.len(),
                    "Answered"
                );
                self.encode(&ResponseBuilder::from_answer(&request, &answer), protocol)
            }
            Resolution::NotAuthoritative => self.delegate(&request, raw, protocol).await,
        }
    }

    async fn delegate(&self, request: &Message, raw: &[u8], protocol: Protocol) -> Option<Vec<u8>> {
        match tokio::time::timeout(self.query_timeout, self.next.handle(raw)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(next = self.next.name(), error = %e, "Next handler failed");
                self.server_failure(request, protocol)
            }
            Err(_) => {
                warn!(next = self.next.name(), "Next handler timed out");
                self.server_failure(request, protocol)
            }
        }
    }

    fn server_failure(&self, request: &Message, protocol: Protocol) -> Option<Vec<u8>> {
        self.encode(&ResponseBuilder::empty(request, ResponseCode::ServFail), protocol)
    }

    fn encode(&self, response: &Message, protocol: Protocol) -> Option<Vec<u8>> {
        let encoded = match protocol {
            Protocol::Udp => ResponseBuilder::serialize_for_udp(response),
            Protocol::Tcp => ResponseBuilder::serialize(response),
        };
        match encoded {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                ResponseBuilder::serialize(&ResponseBuilder::empty(response, ResponseCode::ServFail))
                    .ok()
            }
        }
    }
}
