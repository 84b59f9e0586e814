//! Complaint sender for the primary queue.
//!
//! A [`ComplaintSender`] owns one channel for the lifetime of one request:
//! `connect`, a single `send`, then `disconnect`. [`ComplaintSender::deliver`]
//! runs that sequence and always disconnects, whatever the send outcome.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::transport::{OutboundMessage, QueueChannel, QueueTransport, TransportError};
use super::types::{ComplaintEnvelope, JSON_CONTENT_TYPE};
use crate::complaint::ComplaintSubmission;

/// Errors raised while delivering to a queue.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to connect to queue {queue}: {source}")]
    Connection {
        queue: String,
        #[source]
        source: TransportError,
    },

    #[error("queue client is not connected")]
    NotConnected,

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to send to queue {queue}: {source}")]
    Transport {
        queue: String,
        #[source]
        source: TransportError,
    },
}

/// Default bound for a single connect or send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends complaint envelopes to the primary queue.
pub struct ComplaintSender {
    transport: Arc<dyn QueueTransport>,
    queue_name: String,
    timeout: Duration,
    channel: Option<Box<dyn QueueChannel>>,
}

impl ComplaintSender {
    /// Create a disconnected sender for `queue_name`.
    pub fn new(transport: Arc<dyn QueueTransport>, queue_name: impl Into<String>) -> Self {
        Self {
            transport,
            queue_name: queue_name.into(),
            timeout: DEFAULT_SEND_TIMEOUT,
            channel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Open a channel to the queue.
    ///
    /// Must be paired with [`disconnect`](Self::disconnect). Calling it twice
    /// without disconnecting drops the first channel without closing it.
    pub async fn connect(&mut self) -> Result<(), QueueError> {
        let channel = bounded(self.timeout, self.transport.open(&self.queue_name))
            .await
            .map_err(|source| QueueError::Connection {
                queue: self.queue_name.clone(),
                source,
            })?;

        debug!(queue = %self.queue_name, "queue_sender_connected");
        self.channel = Some(channel);
        Ok(())
    }

    /// Release the channel if there is one. Never fails; a close that
    /// outlives the timeout is logged and abandoned.
    pub async fn disconnect(&mut self) {
        let Some(channel) = self.channel.take() else {
            return;
        };

        match bounded(self.timeout, channel.close()).await {
            Ok(()) => debug!(queue = %self.queue_name, "queue_sender_disconnected"),
            Err(e) => warn!(queue = %self.queue_name, error = %e, "queue_sender_close_error"),
        }
    }

    /// Publish one complaint envelope. No retry.
    pub async fn send(
        &self,
        submission: &ComplaintSubmission,
        timestamp: &DateTime<Utc>,
    ) -> Result<(), QueueError> {
        let channel = self.channel.as_ref().ok_or(QueueError::NotConnected)?;

        let envelope = ComplaintEnvelope::new(submission, timestamp);
        let body = serde_json::to_vec(&envelope)?;
        let body_length = body.len();

        let message = OutboundMessage {
            body,
            content_type: JSON_CONTENT_TYPE,
            message_id: Some(envelope.booking_id.clone()),
        };

        bounded(self.timeout, channel.send(message))
            .await
            .map_err(|source| QueueError::Transport {
                queue: self.queue_name.clone(),
                source,
            })?;

        info!(
            queue = %self.queue_name,
            booking_id = %envelope.booking_id,
            body_length = body_length,
            "complaint_published"
        );

        Ok(())
    }

    /// Connect, send once and disconnect.
    ///
    /// The channel is released on every path after a successful connect.
    pub async fn deliver(
        mut self,
        submission: &ComplaintSubmission,
        timestamp: &DateTime<Utc>,
    ) -> Result<(), QueueError> {
        self.connect().await?;
        let outcome = self.send(submission, timestamp).await;
        self.disconnect().await;
        outcome
    }
}

/// Run a transport future under a deadline.
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}
