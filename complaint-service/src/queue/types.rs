//! Queue message types.
//!
//! This module defines the message formats for:
//! - the primary complaint queue: [`ComplaintEnvelope`]
//! - the unified log queue: [`AuditEvent`]

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::complaint::ComplaintSubmission;

/// Content type for every message this service produces.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Render a timestamp the way every outbound message and response carries it.
///
/// RFC 3339 in UTC with microseconds and a `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// =============================================================================
// Complaint Envelope (primary queue)
// =============================================================================

/// Complaint message placed on the primary queue.
///
/// Field names match what the downstream booking service consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintEnvelope {
    pub booking_id: String,
    pub description: String,
    pub timestamp: String,
}

impl ComplaintEnvelope {
    pub fn new(submission: &ComplaintSubmission, timestamp: &DateTime<Utc>) -> Self {
        Self {
            booking_id: submission.booking_id().to_string(),
            description: submission.description().to_string(),
            timestamp: format_timestamp(timestamp),
        }
    }
}

// =============================================================================
// Audit Events (unified log queue)
// =============================================================================

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

/// Structured event published to the unified log queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub level: AuditLevel,
    /// Machine-readable name such as `complaint.submitted`
    pub event: String,
    pub message: String,
    /// Filled in by the notifier from configuration when left empty
    #[serde(default)]
    pub service: String,
    pub logged_at: String,
    /// Free-form context, flattened into the top-level object
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AuditEvent {
    pub fn new(level: AuditLevel, event: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            event: event.into(),
            message: message.into(),
            service: String::new(),
            logged_at: format_timestamp(&Utc::now()),
            fields: Map::new(),
        }
    }

    pub fn info(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AuditLevel::Info, event, message)
    }

    pub fn error(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AuditLevel::Error, event, message)
    }

    /// Attach a structured field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}
