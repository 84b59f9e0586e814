//! In-memory transport for testing.
//!
//! Records every published message per queue and tracks how many channels
//! were opened and closed, so callers can check the connect/disconnect
//! pairing. Failures can be switched on per stage, and send or close can be
//! made to hang to exercise timeouts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::transport::{OutboundMessage, QueueChannel, QueueTransport, TransportError};

#[derive(Default)]
struct Inner {
    messages: Mutex<HashMap<String, Vec<OutboundMessage>>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    send_attempts: AtomicUsize,
    fail_on_open: AtomicBool,
    fail_on_send: AtomicBool,
    fail_on_close: AtomicBool,
    stall_on_send: AtomicBool,
    stall_on_close: AtomicBool,
}

/// Transport that keeps messages in memory.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    inner: Arc<Inner>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_open(&self, fail: bool) {
        self.inner.fail_on_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.inner.fail_on_send.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_on_close(&self, fail: bool) {
        self.inner.fail_on_close.store(fail, Ordering::SeqCst);
    }

    /// Make `send` hang forever once the attempt is counted.
    pub fn set_stall_on_send(&self, stall: bool) {
        self.inner.stall_on_send.store(stall, Ordering::SeqCst);
    }

    /// Make `close` hang forever once the close is counted.
    pub fn set_stall_on_close(&self, stall: bool) {
        self.inner.stall_on_close.store(stall, Ordering::SeqCst);
    }

    /// Messages successfully published to `queue`, oldest first.
    pub fn messages(&self, queue: &str) -> Vec<OutboundMessage> {
        self.lock_messages().get(queue).cloned().unwrap_or_default()
    }

    /// Total messages published across all queues.
    pub fn message_count(&self) -> usize {
        self.lock_messages().values().map(Vec::len).sum()
    }

    pub fn opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Publish attempts, including failed ones.
    pub fn send_attempts(&self) -> usize {
        self.inner.send_attempts.load(Ordering::SeqCst)
    }

    fn lock_messages(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<OutboundMessage>>> {
        // A poisoned lock only means a test panicked mid-push; the data is still usable.
        self.inner
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl QueueTransport for InMemoryTransport {
    async fn open(&self, queue: &str) -> Result<Box<dyn QueueChannel>, TransportError> {
        if self.inner.fail_on_open.load(Ordering::SeqCst) {
            return Err(TransportError::Other("connection refused".to_string()));
        }
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryChannel {
            transport: self.clone(),
            queue: queue.to_string(),
        }))
    }
}

struct InMemoryChannel {
    transport: InMemoryTransport,
    queue: String,
}

#[async_trait]
impl QueueChannel for InMemoryChannel {
    async fn send(&self, message: OutboundMessage) -> Result<(), TransportError> {
        let inner = &self.transport.inner;
        inner.send_attempts.fetch_add(1, Ordering::SeqCst);
        if inner.stall_on_send.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if inner.fail_on_send.load(Ordering::SeqCst) {
            return Err(TransportError::Other("broker unavailable".to_string()));
        }
        self.transport
            .lock_messages()
            .entry(self.queue.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        let inner = &self.transport.inner;
        inner.closed.fetch_add(1, Ordering::SeqCst);
        if inner.stall_on_close.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if inner.fail_on_close.load(Ordering::SeqCst) {
            return Err(TransportError::Other("close failed".to_string()));
        }
        Ok(())
    }
}
