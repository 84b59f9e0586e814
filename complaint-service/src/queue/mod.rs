//! Queue module for outbound messaging.
//!
//! This module provides:
//! - Message types for the complaint and unified log queues
//! - A transport seam with RabbitMQ and in-memory implementations
//! - The per-request complaint sender and the best-effort audit notifier
//!
//! ## Architecture
//!
//! ```text
//! HTTP handler → ComplaintSender → complaints-event queue → booking service
//!              ↘ AuditNotifier (detached) → unified-logs queue
//! ```

pub mod amqp;
pub mod audit;
pub mod memory;
pub mod sender;
pub mod transport;
pub mod types;

pub use amqp::AmqpTransport;
pub use audit::AuditNotifier;
pub use memory::InMemoryTransport;
pub use sender::{ComplaintSender, QueueError};
pub use transport::{OutboundMessage, QueueChannel, QueueTransport, TransportError};
pub use types::{AuditEvent, AuditLevel, ComplaintEnvelope};
