//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, session_handler};
use crate::domain::UserResponse;
use crate::services::TokenPair;

/// OpenAPI documentation for Authgate
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Authgate",
        version = "0.1.0",
        description = "Username/password authentication service issuing JWT access/refresh token pairs",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        session_handler::validate,
    ),
    components(
        schemas(
            UserResponse,
            TokenPair,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            session_handler::SessionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration, login, and token refresh"),
        (name = "Session", description = "Access-token validation")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
