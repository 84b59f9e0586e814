//! Broker-facing transport abstraction.
//!
//! A [`QueueTransport`] opens a [`QueueChannel`] bound to one queue. The
//! sender and the audit notifier only ever talk to these traits, which lets
//! the router run against RabbitMQ in production and in memory in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("amqp error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("broker rejected the message")]
    Rejected,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

/// One message ready to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub message_id: Option<String>,
}

/// Opens channels to a broker.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Open a channel that publishes to `queue`.
    async fn open(&self, queue: &str) -> Result<Box<dyn QueueChannel>, TransportError>;
}

/// An open channel bound to a single queue.
#[async_trait]
pub trait QueueChannel: Send + Sync {
    /// Publish exactly one message. Implementations never retry.
    async fn send(&self, message: OutboundMessage) -> Result<(), TransportError>;

    /// Release the channel and its underlying connection.
    async fn close(self: Box<Self>) -> Result<(), TransportError>;
}
