//! API contract tests.
//!
//! These tests pin the wire shapes of error and token responses without
//! requiring a database connection.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use authgate::api::handlers::auth_handler::RegisterRequest;
use authgate::api::handlers::session_handler;
use authgate::api::middleware::CurrentUser;
use authgate::errors::AppError;
use authgate::services::{Claims, TokenPair};

async fn response_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Error Contract Tests
// =============================================================================

#[tokio::test]
async fn test_app_error_status_codes() {
    assert_eq!(
        AppError::validation("bad").into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::DuplicateUser.into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::InvalidCredentials.into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::InvalidToken.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::UnknownUser.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::internal("boom").into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_error_body_is_message_only() {
    let body = response_body(AppError::DuplicateUser.into_response()).await;

    assert_eq!(body["message"], "user already exists");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_internal_error_body_hides_detail() {
    let body = response_body(AppError::internal("connection pool exhausted").into_response()).await;

    assert_eq!(body["message"], "internal server error");
}

#[tokio::test]
async fn test_validation_error_body_has_field_detail() {
    let request = RegisterRequest {
        username: "ab".to_string(),
        password: "short".to_string(),
    };
    let errors = request.validate().unwrap_err();

    let response = AppError::InvalidInput(errors).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_body(response).await;
    assert_eq!(body["message"], "invalid input");
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_register_request_validation_bounds() {
    let valid = RegisterRequest {
        username: "alice".to_string(),
        password: "password123".to_string(),
    };
    assert!(valid.validate().is_ok());

    let long_username = RegisterRequest {
        username: "a".repeat(33),
        password: "password123".to_string(),
    };
    assert!(long_username.validate().is_err());
}

// =============================================================================
// Wire Shape Tests
// =============================================================================

#[tokio::test]
async fn test_token_pair_serializes_two_fields() {
    let pair = TokenPair {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
    };

    let value = serde_json::to_value(&pair).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), 2);
    assert_eq!(object["access_token"], "access");
    assert_eq!(object["refresh_token"], "refresh");
}

#[tokio::test]
async fn test_claims_structure() {
    let claims = Claims {
        sub: Uuid::new_v4(),
        exp: Utc::now().timestamp() + 1800,
    };

    assert!(claims.exp > Utc::now().timestamp());

    // Claims round-trip through JSON with `sub` as a string and `exp` numeric
    let value = serde_json::to_value(&claims).unwrap();
    assert!(value["sub"].is_string());
    assert!(value["exp"].is_i64());
}

// =============================================================================
// Session Handler Tests
// =============================================================================

#[tokio::test]
async fn test_validate_echoes_authenticated_subject() {
    let user_id = Uuid::new_v4();

    let response = session_handler::validate(Extension(CurrentUser { id: user_id })).await;

    assert_eq!(response.0.subject, user_id);
    assert_eq!(response.0.message, "session is valid");
}
