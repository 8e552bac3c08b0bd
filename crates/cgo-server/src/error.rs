use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use cgo_core::quota::QuotaDecision;
use cgo_suggest::ClassifyError;

/// Everything a handler can answer with besides success.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error("an organize request is already running")]
    Busy,
    #[error("request quota exhausted")]
    Quota(QuotaDecision),
}

impl ApiError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::Classify(ClassifyError::InputValidation(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Classify(ClassifyError::InputValidation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Classify(ClassifyError::Configuration(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Classify(_) => StatusCode::BAD_GATEWAY,
            ApiError::Busy => StatusCode::CONFLICT,
            ApiError::Quota(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Classify(e) => json!({ "error": e.to_string(), "kind": e.kind() }),
            ApiError::Busy => json!({ "error": self.to_string(), "kind": "busy" }),
            ApiError::Quota(decision) => json!({
                "error": self.to_string(),
                "kind": "quota",
                "reason": decision.reason,
                "remaining": decision.remaining,
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}
