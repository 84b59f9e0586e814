//! Best-effort audit events on the unified log queue.
//!
//! Nothing in here can fail a request: every error is logged and dropped.
//! The handler dispatches events on a detached task after the response has
//! been built.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::amqp::AmqpTransport;
use super::sender::{bounded, DEFAULT_SEND_TIMEOUT};
use super::transport::{OutboundMessage, QueueTransport};
use super::types::{AuditEvent, JSON_CONTENT_TYPE};
use crate::Config;

/// Publishes [`AuditEvent`]s to the unified log queue.
#[derive(Clone)]
pub struct AuditNotifier {
    transport: Arc<dyn QueueTransport>,
    queue_name: String,
    service: String,
    timeout: Duration,
}

impl AuditNotifier {
    pub fn new(
        transport: Arc<dyn QueueTransport>,
        queue_name: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            queue_name: queue_name.into(),
            service: service.into(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the notifier from configuration.
    ///
    /// Returns `None` when no unified log connection string is configured,
    /// which disables audit events entirely.
    pub fn from_config(config: &Config) -> Option<Self> {
        let uri = config.audit_connection_string.as_ref()?;
        Some(
            Self::new(
                Arc::new(AmqpTransport::new(uri.clone())),
                config.audit_queue_name.clone(),
                config.app_name.clone(),
            )
            .with_timeout(config.send_timeout()),
        )
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Publish one event, swallowing every failure.
    pub async fn send(&self, mut event: AuditEvent) {
        if event.service.is_empty() {
            event.service = self.service.clone();
        }

        let body = match serde_json::to_vec(&event) {
            Ok(body) => body,
            Err(e) => {
                warn!(event = %event.event, error = %e, "audit_serialize_failed");
                return;
            }
        };

        let channel = match bounded(self.timeout, self.transport.open(&self.queue_name)).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(queue = %self.queue_name, event = %event.event, error = %e, "audit_connect_failed");
                return;
            }
        };

        let message = OutboundMessage {
            body,
            content_type: JSON_CONTENT_TYPE,
            message_id: None,
        };

        match bounded(self.timeout, channel.send(message)).await {
            Ok(()) => debug!(queue = %self.queue_name, event = %event.event, "audit_event_sent"),
            Err(e) => {
                warn!(queue = %self.queue_name, event = %event.event, error = %e, "audit_send_failed")
            }
        }

        if let Err(e) = bounded(self.timeout, channel.close()).await {
            warn!(queue = %self.queue_name, error = %e, "audit_close_failed");
        }
    }

    /// Publish on a detached task. Callers never need to await the handle.
    pub fn dispatch(&self, event: AuditEvent) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.send(event).await })
    }
}
