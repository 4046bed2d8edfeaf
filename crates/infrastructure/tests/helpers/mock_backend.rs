#![allow(dead_code)]
use async_trait::async_trait;
use rqlite_dns_domain::DomainError;
use rqlite_dns_infrastructure::database::manager::{
    BackendConnection, ManageConnection, RecordRow, Statement,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MockManager {
    connects: Arc<AtomicUsize>,
    fail_connect: Arc<AtomicBool>,
    fail_ping: Arc<AtomicBool>,
}

impl MockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_ping(&self, fail: bool) {
        self.fail_ping.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ManageConnection for MockManager {
    type Connection = MockConnection;

    async fn connect(&self) -> Result<Self::Connection, DomainError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(DomainError::ConnectionFailed("mock refused".to_string()));
        }
        let id = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockConnection {
            id,
            fail_ping: Arc::clone(&self.fail_ping),
        })
    }
}

pub struct MockConnection {
    pub id: usize,
    fail_ping: Arc<AtomicBool>,
}

#[async_trait]
impl BackendConnection for MockConnection {
    async fn ping(&mut self) -> Result<(), DomainError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(DomainError::ConnectionFailed("mock ping failed".to_string()));
        }
        Ok(())
    }

    async fn fetch_rows(&mut self, _statement: &Statement) -> Result<Vec<RecordRow>, DomainError> {
        Ok(Vec::new())
    }

    async fn execute(&mut self, _statement: &Statement) -> Result<(), DomainError> {
        Ok(())
    }
}
