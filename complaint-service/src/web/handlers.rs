//! Complaint and health endpoint handlers.
//!
//! The complaint handler only:
//! 1. Validates the payload
//! 2. Sends it to the primary queue on a connection of its own
//! 3. Schedules an audit event (if configured) and responds
//!
//! Processing of the complaint happens in the downstream booking service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::complaint::ComplaintSubmission;
use crate::queue::types::format_timestamp;
use crate::queue::{AmqpTransport, AuditEvent, AuditNotifier, ComplaintSender, QueueTransport};
use crate::web::error::ApiError;
use crate::Config;

/// Fixed success text of [`ComplaintAcknowledgement`].
pub const SUBMITTED_MESSAGE: &str = "Complaint submitted successfully";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transport: Arc<dyn QueueTransport>,
    pub audit: Option<AuditNotifier>,
}

impl AppState {
    pub fn new(
        config: Config,
        transport: Arc<dyn QueueTransport>,
        audit: Option<AuditNotifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            audit,
        }
    }

    /// Wire the production RabbitMQ transports from configuration.
    pub fn from_config(config: Config) -> Self {
        let transport = Arc::new(AmqpTransport::new(config.queue_connection_string.clone()));
        let audit = AuditNotifier::from_config(&config);
        Self::new(config, transport, audit)
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(value_type = String, example = "healthy")]
    pub status: &'static str,
    #[schema(example = "ComplaintService")]
    pub service: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Health check endpoint.
///
/// Never touches the queue.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "v1",
    responses((status = 200, description = "Service is healthy and operational", body = HealthStatus))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: state.config.app_name.clone(),
        version: state.config.app_version.clone(),
    })
}

// =============================================================================
// Complaints
// =============================================================================

/// Complaint request body for the OpenAPI schema only.
///
/// Requests are never deserialized into this type; the handler validates
/// the raw body through [`ComplaintSubmission`].
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ComplaintRequest {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub booking_id: Uuid,
    #[schema(min_length = 1, max_length = 2000, example = "The groomer was 2 hours late.")]
    pub description: String,
}

/// Response returned once a complaint is on the queue.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintAcknowledgement {
    #[schema(value_type = String, example = "Complaint submitted successfully")]
    pub message: &'static str,
    pub booking_id: Uuid,
    #[schema(example = "2024-01-15T10:30:00.000000Z")]
    pub timestamp: String,
}

/// Submit a complaint for a booking.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    tag = "v1",
    request_body = ComplaintRequest,
    responses(
        (status = 201, description = "Complaint successfully submitted and queued for processing", body = ComplaintAcknowledgement),
        (status = 422, description = "Validation error - invalid request body"),
        (status = 500, description = "Internal server error - failed to send message to queue")
    )
)]
pub async fn submit_complaint(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ComplaintAcknowledgement>), ApiError> {
    let submission = ComplaintSubmission::from_slice(&body).map_err(|errors| {
        info!(error_count = errors.errors().len(), "complaint_rejected");
        ApiError::from(errors)
    })?;

    let booking_id = submission.booking_id();
    let queue_name = &state.config.queue_name;
    let timestamp = Utc::now();
    let timestamp_text = format_timestamp(&timestamp);

    let sender = ComplaintSender::new(Arc::clone(&state.transport), queue_name.clone())
        .with_timeout(state.config.send_timeout());

    if let Err(e) = sender.deliver(&submission, &timestamp).await {
        error!(booking_id = %booking_id, queue = %queue_name, error = %e, "complaint_submit_failed");

        if let Some(audit) = &state.audit {
            audit.dispatch(
                AuditEvent::error("complaint.failed", "Failed to submit complaint")
                    .with_field("bookingId", booking_id.to_string())
                    .with_field("queue", queue_name.as_str()),
            );
        }

        return Err(ApiError::SubmissionFailed);
    }

    info!(booking_id = %booking_id, queue = %queue_name, "complaint_submitted");

    let response = ComplaintAcknowledgement {
        message: SUBMITTED_MESSAGE,
        booking_id,
        timestamp: timestamp_text.clone(),
    };

    if let Some(audit) = &state.audit {
        audit.dispatch(
            AuditEvent::info(
                "complaint.submitted",
                "Complaint submitted and forwarded to queue",
            )
            .with_field("bookingId", booking_id.to_string())
            .with_field("queue", queue_name.as_str())
            .with_field("timestamp", timestamp_text),
        );
    }

    Ok((StatusCode::CREATED, Json(response)))
}

// =============================================================================
// Root
// =============================================================================

/// Redirect the root path to the API documentation.
pub async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/docs")])
}
