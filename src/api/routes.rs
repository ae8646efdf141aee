//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, current_user_routes, health, password_routes, user_routes};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::web::page_routes;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(&state))
        // Front-end page shells
        .merge(page_routes())
        .nest_service("/assets", assets)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON API mounted under `/api`
fn api_routes(state: &AppState) -> Router<AppState> {
    // Credential endpoints (stricter rate limiting)
    let credentials = auth_routes()
        .merge(password_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth_middleware,
        ));

    // Authenticated routes (JWT)
    let protected = current_user_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let general = protected
        .merge(user_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    credentials.merge(general)
}
