//! Web server module for the complaint API.
//!
//! This module provides a thin web server that:
//! - Validates complaint submissions
//! - Forwards each one to the primary queue
//! - Reports health and serves API documentation
//!
//! Complaint processing happens downstream of the queue.

pub mod docs;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, SUBMISSION_FAILED_DETAIL};
pub use handlers::{
    health, root, submit_complaint, AppState, ComplaintAcknowledgement, HealthStatus,
    SUBMITTED_MESSAGE,
};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    // Any origin, no credentials.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_doc = docs::openapi(&state.config.app_name, &state.config.app_version);

    Router::new()
        .route("/", get(root))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", api_doc.clone()))
        .merge(Redoc::with_url("/redoc", api_doc))
        .route("/api/v1/health", get(health))
        .route("/api/v1/complaints", post(submit_complaint))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
