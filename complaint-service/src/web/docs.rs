//! OpenAPI document for the complaint API.
//!
//! Served as JSON at `/openapi.json` and rendered by Swagger UI at `/docs`
//! and Redoc at `/redoc`; see [`build_router`](crate::web::build_router).

use utoipa::OpenApi;

use crate::web::handlers::{self, ComplaintAcknowledgement, ComplaintRequest, HealthStatus};

#[derive(OpenApi)]
#[openapi(
    info(description = "Microservice for handling and forwarding complaints to a message queue"),
    paths(handlers::submit_complaint, handlers::health),
    components(schemas(ComplaintRequest, ComplaintAcknowledgement, HealthStatus)),
    tags((name = "v1", description = "Complaint API v1"))
)]
pub struct ApiDoc;

/// Build the OpenAPI document, titled and versioned from configuration.
pub fn openapi(title: &str, version: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = title.to_string();
    doc.info.version = version.to_string();
    doc
}
