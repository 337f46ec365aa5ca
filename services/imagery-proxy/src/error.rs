//! API error type and its JSON response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imagery_common::ImageryError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Imagery(#[from] ImageryError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Imagery provider API key is not configured")]
    MissingApiKey,

    #[error("Imagery provider returned HTTP {status}")]
    Upstream { status: u16, message: String },

    #[error("Imagery provider unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Imagery provider returned content type '{0}', expected an image")]
    UnexpectedContentType(String),

    #[error("Malformed provider response: {0}")]
    MalformedUpstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Imagery(e) => {
                StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream { .. }
            | ApiError::UpstreamUnavailable(_)
            | ApiError::UnexpectedContentType(_)
            | ApiError::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Imagery(e) => e.error_code(),
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::MissingApiKey => "MissingApiKey",
            ApiError::Upstream { .. } => "UpstreamError",
            ApiError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            ApiError::UnexpectedContentType(_) => "UnexpectedContentType",
            ApiError::MalformedUpstream(_) => "MalformedUpstreamResponse",
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Label for `upstream_errors_total`, `None` for errors raised locally.
    pub fn upstream_kind(&self) -> Option<&'static str> {
        match self {
            ApiError::Upstream { .. } => Some("status"),
            ApiError::UpstreamUnavailable(_) => Some("network"),
            ApiError::UnexpectedContentType(_) => Some("content_type"),
            ApiError::MalformedUpstream(_) => Some("body"),
            _ => None,
        }
    }

    fn details(&self) -> String {
        match self {
            // Provider body passed through so clients see the provider's reason.
            ApiError::Upstream { status, message } if !message.is_empty() => {
                format!("HTTP {}: {}", status, message)
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::UpstreamUnavailable(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, code = self.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.error_code().to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = ImageryError::OutOfRangeLatitude(89.0).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "OutOfRangeLatitude");

        assert_eq!(
            ApiError::MissingApiKey.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::UnexpectedContentType("text/html".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_details_include_provider_body() {
        let err = ApiError::Upstream {
            status: 404,
            message: "scene not found".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.details(), "HTTP 404: scene not found");
        assert_eq!(err.upstream_kind(), Some("status"));
        assert_eq!(ApiError::BadRequest("x".into()).upstream_kind(), None);
    }
}
