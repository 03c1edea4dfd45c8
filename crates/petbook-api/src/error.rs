//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Store or integrity failure. Details are logged, never sent to clients.
  #[error("ledger error: {0}")]
  Ledger(#[source] petbook_core::Error),
}

impl From<petbook_core::Error> for ApiError {
  fn from(e: petbook_core::Error) -> Self {
    use petbook_core::Error as E;
    match e {
      E::NotFound(_) => ApiError::NotFound(e.to_string()),
      E::AlreadyOwned(_) => ApiError::Conflict(e.to_string()),
      E::SelfTransfer { .. } | E::InvalidReason(_) => {
        ApiError::BadRequest(e.to_string())
      }
      other => ApiError::Ledger(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Ledger(e) => {
        tracing::error!(error = %e, "ledger operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "ownership ledger temporarily unavailable, please retry".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
