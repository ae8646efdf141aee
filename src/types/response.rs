use serde::Serialize;
use utoipa::ToSchema;

/// Status-only response, e.g. after requesting a reset link
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "We have emailed your password reset link.")]
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
