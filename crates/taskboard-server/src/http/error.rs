//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use taskboard_core::wire::ErrorResponse;
use taskboard_core::CoreError;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::InvalidColumn(_)
            | CoreError::InvalidPosition(_)
            | CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoreError::PartialUpdateFailure { .. } => StatusCode::CONFLICT,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let CoreError::PartialUpdateFailure { failed, .. } = &self.0 {
            warn!(failed = failed.len(), "Returning partial update failure");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::TaskId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::task_not_found("t"), StatusCode::NOT_FOUND),
            (CoreError::InvalidColumn("X".into()), StatusCode::BAD_REQUEST),
            (CoreError::InvalidPosition("NaN".into()), StatusCode::BAD_REQUEST),
            (CoreError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                CoreError::PartialUpdateFailure {
                    failed: vec![TaskId::new("a")],
                    applied: vec![],
                    rejected: vec![],
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = ApiError(CoreError::Forbidden("nope".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
