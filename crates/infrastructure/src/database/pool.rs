//! Bounded connection pool independent of the backend driver.
//!
//! `max_open` caps checked-out connections through a semaphore, `max_idle`
//! caps what is kept around after release, and `max_lifetime` retires old
//! connections both on release and when they are picked from the idle set.

use super::manager::{BackendConnection, ManageConnection};
use rqlite_dns_domain::{DomainError, ResolverConfig};
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// 0 means unbounded.
    pub max_open: usize,
    /// 0 means released connections are always closed.
    pub max_idle: usize,
    /// `None` means connections never expire.
    pub max_lifetime: Option<Duration>,
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub fn from_resolver(config: &ResolverConfig) -> Self {
        Self {
            max_open: config.max_open_connections,
            max_idle: config.max_idle_connections,
            max_lifetime: (!config.max_lifetime.is_zero()).then_some(config.max_lifetime),
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_resolver(&ResolverConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub open: usize,
    pub idle: usize,
    pub in_use: usize,
    pub max_open: usize,
}

struct IdleConnection<C> {
    conn: C,
    created_at: Instant,
}

struct PoolInner<M: ManageConnection> {
    manager: M,
    config: PoolConfig,
    permits: Option<Arc<Semaphore>>,
    idle: Mutex<VecDeque<IdleConnection<M::Connection>>>,
    open: AtomicUsize,
    closed: AtomicBool,
}

impl<M: ManageConnection> PoolInner<M> {
    fn expired(&self, created_at: Instant) -> bool {
        self.config
            .max_lifetime
            .is_some_and(|lifetime| created_at.elapsed() >= lifetime)
    }

    fn idle_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<IdleConnection<M::Connection>>> {
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn discard(&self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
    }

    fn release(&self, conn: M::Connection, created_at: Instant, broken: bool) {
        if broken || self.closed.load(Ordering::Acquire) || self.expired(created_at) {
            self.discard();
            return;
        }

        let mut idle = self.idle_queue();
        if idle.len() < self.config.max_idle {
            idle.push_back(IdleConnection { conn, created_at });
        } else {
            drop(idle);
            self.discard();
        }
    }
}

pub struct ConnectionPool<M: ManageConnection> {
    inner: Arc<PoolInner<M>>,
}

impl<M: ManageConnection> Clone for ConnectionPool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ManageConnection> ConnectionPool<M> {
    /// Creates the pool without opening any connection.
    pub fn new(manager: M, config: PoolConfig) -> Self {
        let permits = (config.max_open > 0).then(|| Arc::new(Semaphore::new(config.max_open)));
        Self {
            inner: Arc::new(PoolInner {
                manager,
                config,
                permits,
                idle: Mutex::new(VecDeque::new()),
                open: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn manager(&self) -> &M {
        &self.inner.manager
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    pub async fn get(&self) -> Result<PooledConnection<M>, DomainError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(DomainError::PoolClosed);
        }

        let permit = match &self.inner.permits {
            Some(semaphore) => {
                let acquire = Arc::clone(semaphore).acquire_owned();
                let permit = tokio::time::timeout(self.inner.config.acquire_timeout, acquire)
                    .await
                    .map_err(|_| {
                        warn!(
                            max_open = self.inner.config.max_open,
                            "Timed out waiting for a pooled connection"
                        );
                        DomainError::PoolTimeout(self.inner.config.acquire_timeout.as_millis() as u64)
                    })?
                    .map_err(|_| DomainError::PoolClosed)?;
                Some(permit)
            }
            None => None,
        };

        loop {
            let candidate = self.inner.idle_queue().pop_back();
            match candidate {
                Some(idle) if self.inner.expired(idle.created_at) => {
                    debug!("Closing expired idle connection");
                    self.inner.discard();
                }
                Some(idle) => {
                    return Ok(PooledConnection {
                        conn: Some(idle.conn),
                        created_at: idle.created_at,
                        broken: false,
                        pool: Arc::clone(&self.inner),
                        _permit: permit,
                    });
                }
                None => break,
            }
        }

        let conn = self.inner.manager.connect().await?;
        self.inner.open.fetch_add(1, Ordering::AcqRel);
        debug!(open = self.inner.open.load(Ordering::Acquire), "Opened backend connection");

        Ok(PooledConnection {
            conn: Some(conn),
            created_at: Instant::now(),
            broken: false,
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Acquires a connection and performs one round trip.
    pub async fn health_check(&self) -> Result<(), DomainError> {
        let mut conn = self.get().await?;
        match conn.ping().await {
            Ok(()) => Ok(()),
            Err(e) => {
                conn.mark_broken();
                Err(e)
            }
        }
    }

    pub fn status(&self) -> PoolStatus {
        let idle = self.inner.idle_queue().len();
        let open = self.inner.open.load(Ordering::Acquire);
        PoolStatus {
            open,
            idle,
            in_use: open.saturating_sub(idle),
            max_open: self.inner.config.max_open,
        }
    }

    /// Refuses new acquisitions and drops idle connections.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        if let Some(permits) = &self.inner.permits {
            permits.close();
        }
        let drained = self.inner.idle_queue().drain(..).count();
        self.inner.open.fetch_sub(drained, Ordering::AcqRel);
    }
}

/// A checked-out connection; returns to the pool on drop.
pub struct PooledConnection<M: ManageConnection> {
    conn: Option<M::Connection>,
    created_at: Instant,
    broken: bool,
    pool: Arc<PoolInner<M>>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl<M: ManageConnection> PooledConnection<M> {
    /// The connection is closed on release instead of going back to the idle set.
    pub fn mark_broken(&mut self) {
        self.broken = true;
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl<M: ManageConnection> Deref for PooledConnection<M> {
    type Target = M::Connection;

    fn deref(&self) -> &Self::Target {
        // Only `Drop` takes the connection out.
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<M: ManageConnection> DerefMut for PooledConnection<M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<M: ManageConnection> Drop for PooledConnection<M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn, self.created_at, self.broken);
        }
    }
}
