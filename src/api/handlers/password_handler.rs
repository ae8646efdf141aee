//! Password reset handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{STATUS_PASSWORD_RESET, STATUS_RESET_LINK_SENT};
use crate::errors::AppResult;
use crate::types::StatusResponse;

/// Reset link request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// New password submitted from the reset page
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    /// Token from the reset link
    #[validate(length(min = 1, message = "The token field is required"))]
    pub token: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        must_match(other = "password_confirmation", message = "The password confirmation does not match")
    )]
    pub password: String,
    pub password_confirmation: String,
}

pub fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/api/forgot-password",
    tag = "Password reset",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = StatusResponse),
        (status = 400, description = "Validation error or unknown email"),
        (status = 429, description = "A link was requested too recently")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    state
        .password_reset_service
        .send_reset_link(&payload.email)
        .await?;

    Ok(Json(StatusResponse::new(STATUS_RESET_LINK_SENT)))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/api/reset-password",
    tag = "Password reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = StatusResponse),
        (status = 400, description = "Validation error, unknown email or invalid token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    state
        .password_reset_service
        .reset(&payload.email, &payload.token, &payload.password)
        .await?;

    Ok(Json(StatusResponse::new(STATUS_PASSWORD_RESET)))
}
