use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Why a request was rejected before reaching the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("species must not be empty")]
    EmptySpecies,

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} = {value} must be a non-negative number")]
    Negative { field: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Body that does not decode into a request: malformed JSON, a missing
    /// field, an unknown bottom type or an unreadable timestamp.
    #[error("invalid request: {}", .0.body_text())]
    Malformed(#[from] JsonRejection),

    #[error("Prediction failed: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Malformed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(_) = &self {
            tracing::error!("{}", self);
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_failure_is_500_with_message() {
        let (status, body) = render(ApiError::Internal("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Prediction failed: boom" }));
    }

    #[tokio::test]
    async fn validation_failure_is_422() {
        let (status, body) = render(ValidationError::EmptySpecies.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "error": "invalid request: species must not be empty" }));
    }
}
