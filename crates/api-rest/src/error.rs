//! API errors and their JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use api_shared::{AccessDenied, ErrorDetail, ErrorRes};
use triage_core::{ReportError, TriageError};

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// The body could not be extracted; keeps the status axum chose (400, 413, 415 or 422).
    #[error("Rejected body ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Access denied")]
    AccessDenied,
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Rejected { status, message } => (status, rejection_code(status), message),
            ApiError::AccessDenied => (
                StatusCode::FORBIDDEN,
                "ACCESS_DENIED",
                "Client is not allowed to use this service".to_string(),
            ),
            ApiError::UpstreamUnavailable(detail) => {
                tracing::error!(detail = %detail, "upstream model unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "The language model service is unavailable".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorRes {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            e if e.is_upstream() => ApiError::UpstreamUnavailable(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        tracing::warn!(error = %err, "rejected client");
        ApiError::AccessDenied
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

fn rejection_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        _ => "BAD_REQUEST",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_detail() {
        let response = ApiError::from(ReportError::NoSymptoms).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "at least one symptom is required");
    }

    #[tokio::test]
    async fn access_denied_returns_403() {
        let response = ApiError::from(AccessDenied { client: None }).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"]["code"], "ACCESS_DENIED");
    }

    #[tokio::test]
    async fn upstream_errors_return_502_without_upstream_body() {
        let err: ApiError = TriageError::UpstreamStatus {
            status: 500,
            body: "quota exceeded for key".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UPSTREAM_UNAVAILABLE");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("quota"));
    }

    #[tokio::test]
    async fn rejected_body_keeps_its_status() {
        let err = ApiError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "UNSUPPORTED_MEDIA_TYPE"
        );
    }

    #[tokio::test]
    async fn client_build_failure_is_internal() {
        let err: ApiError = TriageError::HttpClient("tls backend".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
