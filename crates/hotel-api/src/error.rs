//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{FromRequest, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use hotel_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error through its domain outcome.
  pub fn from_store<E: Into<hotel_core::Error>>(err: E) -> Self {
    Self::from(err.into())
  }
}

impl From<hotel_core::Error> for ApiError {
  fn from(err: hotel_core::Error) -> Self {
    match err.kind() {
      ErrorKind::Validation | ErrorKind::Conflict => {
        ApiError::BadRequest(err.to_string())
      }
      ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
      ErrorKind::Unavailable => ApiError::Unavailable(err.to_string()),
      ErrorKind::Internal => ApiError::Store(Box::new(err)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unavailable(m) => {
        (StatusCode::SERVICE_UNAVAILABLE, m.clone())
      }
      ApiError::Store(e) => {
        // Detail stays in the log; the client gets a generic message.
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// A JSON request body whose rejections use the `{ "error" }` shape.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

/// Parse a numeric path id, rejecting anything else with 400.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid id: {raw:?}")))
}
