use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

/// Error type for web handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// The data store rejected a write
  #[error("Store request failed ({status}): {body}")]
  Upstream { status: u16, body: String },

  #[error("Internal error: {0}")]
  InternalError(String),
}

impl From<StoreError> for ApiError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Status { status, body } => ApiError::Upstream { status, body },
      other => ApiError::InternalError(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
      ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("{}", self);

    let body = match &self {
      ApiError::Upstream { status, body } => json!({
        "error": self.to_string(),
        "status": status,
        "body": body,
      }),
      _ => json!({ "error": self.to_string() }),
    };

    (status, Json(body)).into_response()
  }
}

/// Helper type for handler results
pub type ApiResult<T> = Result<T, ApiError>;
