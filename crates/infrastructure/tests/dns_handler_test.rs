use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType as HickoryRecordType};
use rqlite_dns_application::ports::{NextHandler, RecordStore};
use rqlite_dns_application::use_cases::ResolveQueryUseCase;
use rqlite_dns_domain::{DomainError, RecordType, StoredRecord};
use rqlite_dns_infrastructure::dns::{DnsRequestHandler, ForwardHandler, RefuseHandler, ZoneCache};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::builders::{encode, query_message};
use helpers::{query_bytes, record, soa, MockUpstream, SqliteFixture};

fn example_zone() -> Vec<StoredRecord> {
    vec![
        soa("example.com."),
        record(
            "example.com.",
            "www.example.com.",
            RecordType::A,
            r#"{"ip":"203.0.113.10"}"#,
            Some(600),
        ),
        record(
            "example.com.",
            "alias.example.com.",
            RecordType::CNAME,
            r#"{"host":"www.example.com."}"#,
            None,
        ),
        record(
            "example.com.",
            "big.example.com.",
            RecordType::TXT,
            &format!(r#"{{"text":"{}"}}"#, "x".repeat(700)),
            None,
        ),
    ]
}

async fn handler_with(
    store: Arc<dyn RecordStore>,
    next: Arc<dyn NextHandler>,
    timeout: Duration,
) -> DnsRequestHandler {
    let zones = Arc::new(ZoneCache::load(Arc::clone(&store)).await.unwrap());
    let use_case = Arc::new(ResolveQueryUseCase::new(store, zones, 300));
    DnsRequestHandler::new(use_case, next, timeout)
}

async fn handler(fixture: &SqliteFixture) -> DnsRequestHandler {
    handler_with(
        fixture.store.clone(),
        Arc::new(RefuseHandler),
        Duration::from_secs(2),
    )
    .await
}

fn parse(bytes: Option<Vec<u8>>) -> Message {
    Message::from_vec(&bytes.expect("handler should reply")).unwrap()
}

#[tokio::test]
async fn test_authoritative_answer() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let response = parse(
        handler
            .handle_udp(&query_bytes(0x1234, "www.example.com.", HickoryRecordType::A))
            .await,
    );

    assert_eq!(response.id(), 0x1234);
    assert_eq!(response.message_type(), MessageType::Response);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(response.authoritative());
    assert!(response.recursion_desired());
    assert_eq!(response.queries().len(), 1);
    assert_eq!(response.answers().len(), 1);

    let answer = &response.answers()[0];
    assert_eq!(answer.ttl(), 600);
    match answer.data() {
        RData::A(a) => assert_eq!(a.0, Ipv4Addr::new(203, 0, 113, 10)),
        other => panic!("expected A, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cname_chain_in_order() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let response = parse(
        handler
            .handle_udp(&query_bytes(7, "alias.example.com.", HickoryRecordType::A))
            .await,
    );

    let types: Vec<HickoryRecordType> = response.answers().iter().map(|r| r.record_type()).collect();
    assert_eq!(types, vec![HickoryRecordType::CNAME, HickoryRecordType::A]);
    assert_eq!(response.answers()[0].ttl(), 300);
}

#[tokio::test]
async fn test_nxdomain_carries_soa() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let response = parse(
        handler
            .handle_udp(&query_bytes(9, "missing.example.com.", HickoryRecordType::A))
            .await,
    );

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.authoritative());
    assert!(response.answers().is_empty());
    assert_eq!(response.name_servers().len(), 1);
    assert_eq!(
        response.name_servers()[0].record_type(),
        HickoryRecordType::SOA
    );
}

#[tokio::test]
async fn test_non_authoritative_goes_to_next_handler() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let response = parse(
        handler
            .handle_udp(&query_bytes(11, "www.example.net.", HickoryRecordType::A))
            .await,
    );

    assert_eq!(response.id(), 11);
    assert_eq!(response.response_code(), ResponseCode::Refused);
    assert!(!response.authoritative());
}

#[tokio::test]
async fn test_non_authoritative_is_forwarded_upstream() {
    let upstream = MockUpstream::start().await;
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler_with(
        fixture.store.clone(),
        Arc::new(ForwardHandler::new(upstream.addr(), Duration::from_secs(1))),
        Duration::from_secs(2),
    )
    .await;

    let response = parse(
        handler
            .handle_udp(&query_bytes(21, "www.example.net.", HickoryRecordType::A))
            .await,
    );

    assert_eq!(upstream.received(), 1);
    assert_eq!(response.id(), 21);
    assert_eq!(response.answers().len(), 1);
}

#[tokio::test]
async fn test_non_internet_class_is_not_implemented() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let mut query = Query::new();
    query.set_name(Name::from_str("www.example.com.").unwrap());
    query.set_query_type(HickoryRecordType::A);
    query.set_query_class(DNSClass::CH);
    let mut message = Message::new(3, MessageType::Query, OpCode::Query);
    message.add_query(query);

    let response = parse(handler.handle_udp(&encode(&message)).await);
    assert_eq!(response.response_code(), ResponseCode::NotImp);
}

#[tokio::test]
async fn test_unsupported_opcode_is_not_implemented() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let mut message = query_message(5, "www.example.com.", HickoryRecordType::A);
    message.set_op_code(OpCode::Status);

    let response = parse(handler.handle_udp(&encode(&message)).await);
    assert_eq!(response.response_code(), ResponseCode::NotImp);
}

#[tokio::test]
async fn test_missing_question_is_format_error() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let message = Message::new(6, MessageType::Query, OpCode::Query);
    let response = parse(handler.handle_udp(&encode(&message)).await);
    assert_eq!(response.response_code(), ResponseCode::FormErr);
}

#[tokio::test]
async fn test_garbage_after_header_is_format_error() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    let mut raw = vec![0xbe, 0xef, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    raw.extend_from_slice(&[0x3f, 0xff]);

    let response = parse(handler.handle_udp(&raw).await);
    assert_eq!(response.id(), 0xbeef);
    assert_eq!(response.response_code(), ResponseCode::FormErr);
}

#[tokio::test]
async fn test_short_input_and_responses_are_dropped() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    assert!(handler.handle_udp(&[0x00, 0x01, 0x02]).await.is_none());

    let mut message = query_message(8, "www.example.com.", HickoryRecordType::A);
    let mut header = *message.header();
    header.set_message_type(MessageType::Response);
    message.set_header(header);
    assert!(handler.handle_udp(&encode(&message)).await.is_none());
}

#[tokio::test]
async fn test_backend_failure_is_servfail() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;

    fixture.store.pool().close();

    let response = parse(
        handler
            .handle_udp(&query_bytes(13, "www.example.com.", HickoryRecordType::A))
            .await,
    );
    assert_eq!(response.response_code(), ResponseCode::ServFail);
}

#[tokio::test]
async fn test_oversized_udp_answer_is_truncated() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let handler = handler(&fixture).await;
    let query = query_bytes(15, "big.example.com.", HickoryRecordType::TXT);

    let udp = parse(handler.handle_udp(&query).await);
    assert!(udp.truncated());
    assert!(udp.answers().is_empty());
    assert_eq!(udp.queries().len(), 1);

    let tcp = parse(handler.handle_tcp(&query).await);
    assert!(!tcp.truncated());
    assert_eq!(tcp.answers().len(), 1);
}

/// Delegates to a real store but stalls on record lookups.
struct SlowStore {
    inner: Arc<dyn RecordStore>,
    delay: Duration,
}

#[async_trait]
impl RecordStore for SlowStore {
    async fn ping(&self) -> Result<(), DomainError> {
        self.inner.ping().await
    }

    async fn fetch_zone_metadata(&self) -> Result<Vec<StoredRecord>, DomainError> {
        self.inner.fetch_zone_metadata().await
    }

    async fn fetch_records(
        &self,
        zone: &str,
        names: &[Arc<str>],
    ) -> Result<Vec<StoredRecord>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_records(zone, names).await
    }
}

#[tokio::test]
async fn test_deadline_exceeded_is_servfail() {
    let fixture = SqliteFixture::with_records(&example_zone()).await;
    let store = Arc::new(SlowStore {
        inner: fixture.store.clone(),
        delay: Duration::from_millis(500),
    });
    let handler = handler_with(store, Arc::new(RefuseHandler), Duration::from_millis(50)).await;

    let response = parse(
        handler
            .handle_tcp(&query_bytes(17, "www.example.com.", HickoryRecordType::A))
            .await,
    );
    assert_eq!(response.response_code(), ResponseCode::ServFail);
}
