//! HTTP error responses

use crate::error::FilingError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Filing(#[from] FilingError),

    #[error("{0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Status code the error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Filing(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Filing(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Filing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unsupported = ApiError::from(FilingError::UnsupportedFilingType("S-1".to_string()));
        assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unsupported.to_string(), "Filing type 'S-1' is not supported.");

        let missing = ApiError::from(FilingError::NotFound("No filings".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let config = ApiError::from(FilingError::ConfigError("SEC_API_KEY not found.".to_string()));
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::InvalidBody("missing field".to_string()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
