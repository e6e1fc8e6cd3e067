use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Error types for the pricing service.
/// Every core pricing failure is an `InvalidParameter`: inputs are already in
/// memory, so nothing here is transient and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PricingError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. } | Self::UnknownScenario(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Data(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<csv::Error> for PricingError {
    fn from(e: csv::Error) -> Self {
        PricingError::Data(e.to_string())
    }
}

impl From<std::io::Error> for PricingError {
    fn from(e: std::io::Error) -> Self {
        PricingError::Data(e.to_string())
    }
}

impl From<tokio::task::JoinError> for PricingError {
    fn from(e: tokio::task::JoinError) -> Self {
        PricingError::Internal(e.to_string())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type PricingResult<T> = Result<T, PricingError>;
