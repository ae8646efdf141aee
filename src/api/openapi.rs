//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use domain::UserResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, password_handler, user_handler};
use crate::services::TokenResponse;
use crate::types::StatusResponse;

/// OpenAPI documentation for the auth portal API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth Portal",
        version = "0.1.0",
        description = "User registration, authentication and password reset API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Password reset endpoints
        password_handler::forgot_password,
        password_handler::reset_password,
        // User endpoints
        user_handler::get_current_user,
        user_handler::list_users,
    ),
    components(
        schemas(
            UserResponse,
            TokenResponse,
            StatusResponse,
            auth_handler::RegisterRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginRequest,
            password_handler::ForgotPasswordRequest,
            password_handler::ResetPasswordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Password reset", description = "Reset links and new passwords"),
        (name = "Users", description = "User lookup")
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
                        .description(Some("JWT token obtained from /api/login or /api/register"))
                        .build(),
                ),
            );
        }
    }
}
