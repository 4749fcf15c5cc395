//! Handler for `GET /test`, a liveness check that never touches the store.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Status {
  pub message:   &'static str,
  pub timestamp: DateTime<Utc>,
}

/// `GET /test`
pub async fn handler() -> Json<Status> {
  Json(Status { message: "API running", timestamp: Utc::now() })
}
