//! Relay error kinds and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const INVALID_SPORT_MESSAGE: &str = "Invalid sport parameter";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from SofaScore";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// `sport` missing, empty, or not a known selector.
    #[error("invalid sport selector")]
    InvalidSelector,

    /// Transport failure, timeout, or non-2xx status from the upstream.
    #[error("upstream fetch failed: {0}")]
    UpstreamFailure(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidSelector => StatusCode::BAD_REQUEST,
            RelayError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// The upstream cause stays in the logs; callers only ever see the fixed text.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = match self {
            RelayError::InvalidSelector => INVALID_SPORT_MESSAGE,
            RelayError::UpstreamFailure(_) => UPSTREAM_FAILURE_MESSAGE,
        };
        (self.status(), axum::Json(json!({ "error": message }))).into_response()
    }
}
