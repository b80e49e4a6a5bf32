//! Session handlers - authenticated token introspection.

use axum::{response::Json, routing::get, Extension, Router};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// Session validation response
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Human-readable status
    #[schema(example = "session is valid")]
    pub message: String,
    /// Authenticated user ID
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub subject: Uuid,
}

/// Create session routes (mounted behind the auth middleware)
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/", get(validate))
}

/// Echo the authenticated subject.
///
/// The auth middleware has already verified the access token; this
/// handler only reports what it established.
#[utoipa::path(
    get,
    path = "/session",
    tag = "Session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Access token is valid", body = SessionResponse),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn validate(Extension(user): Extension<CurrentUser>) -> Json<SessionResponse> {
    Json(SessionResponse {
        message: "session is valid".to_string(),
        subject: user.id,
    })
}
