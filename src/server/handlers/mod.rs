//! HTTP handlers for the server.

pub mod labels;
pub mod layouts;
pub mod sheets;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{ErrorKind, LabelError};

/// JSON error payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// A [`LabelError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub LabelError);

impl From<LabelError> for ApiError {
    fn from(err: LabelError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(LabelError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(LabelError::validation(rejection.body_text()))
    }
}

impl ApiError {
    /// A blocking task panicked or was cancelled.
    pub fn task(err: tokio::task::JoinError, kind: ErrorKind) -> Self {
        let msg = format!("Task error: {}", err);
        match kind {
            ErrorKind::Persistence => ApiError(LabelError::Persistence(msg)),
            _ => ApiError(LabelError::Render(msg)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Exhaustion => StatusCode::CONFLICT,
            ErrorKind::Persistence | ErrorKind::Render => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.kind().as_str(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(LabelError::validation("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(LabelError::Exhaustion {
                prefix: "T".into(),
                last: 9,
                requested: 1,
                max: 9
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(LabelError::Persistence("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(LabelError::Render("pdf".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
