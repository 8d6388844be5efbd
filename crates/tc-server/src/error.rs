use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use tc_types::{DataError, MetricsError, TcError};

/// Error type for API responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad_request: {0}")]
    BadRequest(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("internal_error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::BadRequest(msg) | Self::Unprocessable(msg) => msg.clone(),
            Self::Internal(msg) => {
                error!("request failed: {}", msg);
                "internal error".to_string()
            }
        };
        (self.status(), axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<TcError> for ApiError {
    fn from(e: TcError) -> Self {
        match e {
            TcError::Validation(msg) => Self::Unprocessable(msg),
            TcError::Metrics(MetricsError::NoTickers) => Self::Unprocessable(e.to_string()),
            TcError::Metrics(MetricsError::InvalidConfig { .. }) => Self::Unprocessable(e.to_string()),
            TcError::Data(DataError::InvalidDateRange { .. }) => Self::BadRequest(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Undecodable bodies (bad JSON, wrong field types, unparseable dates) are
/// 422; anything else the JSON extractor rejects is 400.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => Self::Unprocessable(message),
            _ => Self::BadRequest(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_types::validation_error;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = validation_error!("weight must be non-negative").into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = TcError::from(DataError::InvalidDateRange {
            start: "2024-02-01".into(),
            end: "2024-01-01".into(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = TcError::Internal("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let response = ApiError::Internal("db password wrong".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
