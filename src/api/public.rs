//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", self.0),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Body returned for expected failures such as an unknown governorate
/// or a discovery that's already running.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn response(status: StatusCode, error: &str) -> Response {
        (
            status,
            axum::Json(ErrorResponse {
                error: error.to_string(),
            }),
        )
            .into_response()
    }
}

// Re-export public types from each route

pub mod places {
    pub use crate::api::routes::places::public::*;
}

pub mod preferences {
    pub use crate::api::routes::preferences::public::*;
}
