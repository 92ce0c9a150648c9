use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::firecrawl::FirecrawlError;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    MalformedBody(String),

    /// The upstream call failed; `context` says which tool was running.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: FirecrawlError,
    },
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        ProxyError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "VALIDATION_ERROR", "message": message } }),
            ),
            ProxyError::MalformedBody(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "VALIDATION_ERROR", "message": message } }),
            ),
            ProxyError::Upstream { context, source } => {
                error!("{context}: {source}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": {
                            "code": "UPSTREAM_ERROR",
                            "message": context,
                            "details": upstream_details(source),
                        }
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn upstream_details(source: &FirecrawlError) -> Value {
    match source {
        FirecrawlError::Api { body, .. } => body.clone(),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_api_error_keeps_body_as_details() {
        let err = ProxyError::Upstream {
            context: "Failed to extract data",
            source: FirecrawlError::Api {
                status: 402,
                body: json!({"error": "Payment required"}),
            },
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = ProxyError::Validation("URL is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
