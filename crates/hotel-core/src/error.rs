//! Error types for `hotel-core`.

use thiserror::Error;

use crate::{guest::GuestId, stay::StayId};

/// Coarse classification used by outer layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The caller sent incomplete or malformed input.
  Validation,
  /// The request collides with existing state.
  Conflict,
  NotFound,
  /// No store connection could be acquired in time.
  Unavailable,
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid date in {field}: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("checkout must be strictly after check-in")]
  CheckoutNotAfterCheckin,

  #[error("invalid amount paid: {0:?}")]
  InvalidAmount(String),

  #[error("identity document {0:?} is already registered")]
  DuplicateDocument(String),

  #[error("room {0} is already occupied")]
  RoomOccupied(String),

  #[error("guest {0} has active stays")]
  GuestHasActiveStays(GuestId),

  #[error("guest not found: {0}")]
  GuestNotFound(GuestId),

  #[error("stay not found: {0}")]
  StayNotFound(StayId),

  /// The stay is missing or already finalized; the two are not told apart.
  #[error("stay {0} not found or already finalized")]
  StayNotActive(StayId),

  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingField(_)
      | Self::InvalidDate { .. }
      | Self::CheckoutNotAfterCheckin
      | Self::InvalidAmount(_) => ErrorKind::Validation,
      Self::DuplicateDocument(_)
      | Self::RoomOccupied(_)
      | Self::GuestHasActiveStays(_) => ErrorKind::Conflict,
      Self::GuestNotFound(_) | Self::StayNotFound(_) | Self::StayNotActive(_) => {
        ErrorKind::NotFound
      }
      Self::Unavailable(_) => ErrorKind::Unavailable,
      Self::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
