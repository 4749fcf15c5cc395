//! Acknowledgement bodies returned by mutating endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// `201` body for a newly created row.
#[derive(Debug, Serialize)]
pub struct Created {
  pub id:      i64,
  pub success: bool,
  pub message: &'static str,
}

impl Created {
  pub fn new(id: i64, message: &'static str) -> Self {
    Self { id, success: true, message }
  }
}

/// `200` body for an update or delete.
#[derive(Debug, Serialize)]
pub struct Ack {
  pub success: bool,
  pub message: &'static str,
}

impl Ack {
  pub fn new(message: &'static str) -> Self { Self { success: true, message } }
}

/// `200` body for a completed checkout.
#[derive(Debug, Serialize)]
pub struct CheckedOut {
  pub success:        bool,
  pub message:        &'static str,
  pub fecha_checkout: Option<DateTime<Utc>>,
}
