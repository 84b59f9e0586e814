//! Complaint service - forwards booking complaints onto a message queue.
//!
//! The HTTP layer validates each submission, hands it to the primary queue
//! over a connection opened for that request, and optionally records an
//! audit event on a secondary queue.
//!
//! ## Architecture
//!
//! ```text
//! POST /api/v1/complaints → validate → ComplaintSender → complaints-event → booking service
//!                                    ↘ AuditNotifier (detached) → unified-logs
//! ```

pub mod complaint;
pub mod config;
pub mod queue;
pub mod web;

// Re-export commonly used types
pub use complaint::{ComplaintSubmission, ValidationErrors};
pub use config::{Config, ConfigError};
pub use queue::{
    AmqpTransport, AuditEvent, AuditNotifier, ComplaintEnvelope, ComplaintSender,
    InMemoryTransport, QueueError,
};
pub use web::{build_router, AppState};
