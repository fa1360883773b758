use crate::errors::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub code: u16,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}, {})", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::Config(_) => StatusCode::BAD_REQUEST,
            Error::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::TaskTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::TaskFailure { .. } | Error::Llm(_) | Error::Tool { .. } | Error::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, &error.to_string())
    }
}

/// Helper function to create API errors
pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        message: message.to_string(),
        code: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskId;
    use crate::errors::ExtractionError;
    use std::time::Duration;

    #[test]
    fn pipeline_errors_map_to_statuses() {
        let code = |e: Error| ApiError::from(e).code;

        assert_eq!(code(Error::Config("empty".into())), 400);
        assert_eq!(code(Error::Extraction(ExtractionError::NoBlockFound)), 422);
        assert_eq!(
            code(Error::TaskTimeout {
                task: TaskId::from("intake"),
                timeout: Duration::from_secs(60),
            }),
            504
        );
        assert_eq!(
            code(Error::TaskFailure {
                task: TaskId::from("intake"),
                reason: "LLM error".into(),
            }),
            502
        );
        assert_eq!(
            code(Error::DependencyViolation {
                task: TaskId::from("map"),
                missing: vec![TaskId::from("intake")],
            }),
            500
        );
        assert_eq!(code(Error::Pipeline("terminal task has no output".into())), 500);
    }
}
