//! Rate limiting middleware backed by the configured `RateLimiter`.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};
use crate::errors::AppError;

const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Extract client identifier for rate limiting.
///
/// Forwarded headers are only honoured behind a trusted proxy; otherwise
/// the connection IP is used.
fn get_client_identifier(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_client(request) {
            return ip;
        }
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

fn forwarded_client(request: &Request) -> Option<String> {
    // First entry is the original client
    if let Some(ip) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
    {
        return Some(ip.trim().to_string());
    }

    request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .map(|ip| ip.trim().to_string())
}

/// Count the request under `scope` and reject it once the window is full.
///
/// Fails closed: a limiter error denies the request.
async fn enforce(
    state: &AppState,
    scope: &str,
    limit: u64,
    window_seconds: u64,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_id = get_client_identifier(&request, state.trust_proxy);
    let key = format!("{}:{}", scope, client_id);

    let decision = match state.rate_limiter.hit(&key, limit, window_seconds).await {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(error = %e, scope = scope, "Rate limit check failed - denying request");
            return Err(AppError::too_many_requests(
                RATE_LIMITED_MESSAGE,
                Some(window_seconds),
            ));
        }
    };

    if !decision.allowed() {
        tracing::warn!(
            client = %client_id,
            scope = scope,
            count = decision.count,
            "Rate limit exceeded"
        );
        return Err(AppError::too_many_requests(
            RATE_LIMITED_MESSAGE,
            Some(decision.reset_after),
        ));
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining()));

    Ok(response)
}

/// General rate limiting middleware.
/// Limits requests to RATE_LIMIT_REQUESTS per RATE_LIMIT_WINDOW_SECONDS.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(
        &state,
        "general",
        RATE_LIMIT_REQUESTS,
        RATE_LIMIT_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}

/// Stricter rate limiting for authentication endpoints.
/// Limits requests to RATE_LIMIT_AUTH_REQUESTS per RATE_LIMIT_AUTH_WINDOW_SECONDS.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(
        &state,
        "auth",
        RATE_LIMIT_AUTH_REQUESTS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}
