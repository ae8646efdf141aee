//! User handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use domain::UserResponse;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::{AppError, AppResult};

/// Authenticated route returning the caller
pub fn current_user_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_current_user))
}

/// Public user listing
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    // A valid token for a deleted account is not a session
    let user = state
        .user_service
        .get_user(current_user.id)
        .await
        .map_err(|e| match e {
            AppError::NotFound => AppError::Unauthorized,
            other => other,
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// List every registered user
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
