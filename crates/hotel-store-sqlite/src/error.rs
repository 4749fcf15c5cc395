//! Error type for `hotel-store-sqlite`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain outcome: not found, conflict, validation.
  #[error("core error: {0}")]
  Core(#[from] hotel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// The blocking task running a closure panicked or was aborted.
  #[error("database task failed: {0}")]
  Interact(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown stay state in store: {0:?}")]
  UnknownState(String),

  #[error("no database connection available within {0:?}")]
  PoolTimeout(Duration),

  #[error("connection pool is closed")]
  PoolClosed,

  #[error("connection pool error: {0}")]
  Pool(String),

  #[error("failed to build connection pool: {0}")]
  Build(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for hotel_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      e @ (Error::PoolTimeout(_) | Error::PoolClosed) => {
        hotel_core::Error::Unavailable(e.to_string())
      }
      other => hotel_core::Error::Store(Box::new(other)),
    }
  }
}
