use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::service::ServiceError;

use super::COPYLESS_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotReady(String),

    #[error("plagiarism check failed: {0}")]
    CheckFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmptyInput => GatewayError::InvalidRequest(err.to_string()),
            ServiceError::NotReady { .. } | ServiceError::CorpusUnavailable { .. } => {
                GatewayError::NotReady(format!(
                    "Plagiarism service is not initialized. {}",
                    err
                ))
            }
            ServiceError::IndexBuildFailure { .. } | ServiceError::Query { .. } => {
                GatewayError::CheckFailed(err.to_string())
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, copyless_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::NotReady(_) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
            GatewayError::CheckFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "check_error"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            COPYLESS_STATUS_HEADER,
            HeaderValue::from_static(copyless_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
