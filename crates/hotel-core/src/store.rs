//! The `FrontDeskStore` trait.
//!
//! Implemented by storage backends (e.g. `hotel-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.
//!
//! Every consistency rule that spans more than one row (document uniqueness,
//! one active stay per room, no deleting a guest who is checked in) is the
//! backend's job and must hold under concurrent callers.

use std::future::Future;

use crate::{
  guest::{Guest, GuestId, NewGuest},
  stay::{NewStay, Stay, StayFilter, StayId, StayRecord, StayUpdate},
};

/// Abstraction over a front-desk store backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait FrontDeskStore: Send + Sync {
  /// Backend error; must carry the domain outcome so callers can classify
  /// it.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Guest directory ─────────────────────────────────────────────────────

  /// All guests, most recently registered first.
  fn list_guests(
    &self,
  ) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + '_;

  /// Retrieve a guest by id. Returns `None` if not found.
  fn get_guest(
    &self,
    id: GuestId,
  ) -> impl Future<Output = Result<Option<Guest>, Self::Error>> + Send + '_;

  /// Register a guest. Fails with
  /// [`DuplicateDocument`](crate::Error::DuplicateDocument) if the identity
  /// document is taken.
  fn create_guest(
    &self,
    guest: NewGuest,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  /// Overwrite every mutable field of a guest.
  fn update_guest(
    &self,
    id: GuestId,
    guest: NewGuest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a guest who has no active stay. Their finalized stays stay in
  /// the ledger with the guest link cleared.
  fn delete_guest(
    &self,
    id: GuestId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Stay ledger ─────────────────────────────────────────────────────────

  /// Check a guest into a room, creating an active stay.
  ///
  /// Fails with [`GuestNotFound`](crate::Error::GuestNotFound) or
  /// [`RoomOccupied`](crate::Error::RoomOccupied). The occupancy check and
  /// the insert are one atomic step.
  fn create_stay(
    &self,
    stay: NewStay,
  ) -> impl Future<Output = Result<Stay, Self::Error>> + Send + '_;

  /// Finalize an active stay, stamping the checkout time and the total paid.
  ///
  /// Fails with [`StayNotActive`](crate::Error::StayNotActive) if the stay is
  /// missing or already finalized; a finalized stay is left untouched.
  fn checkout(
    &self,
    id: StayId,
    amount_paid: f64,
  ) -> impl Future<Output = Result<Stay, Self::Error>> + Send + '_;

  /// Change the room, room type and observations of an active stay.
  fn update_stay(
    &self,
    id: StayId,
    update: StayUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve one stay joined with its guest. Returns `None` if not found.
  fn get_stay(
    &self,
    id: StayId,
  ) -> impl Future<Output = Result<Option<StayRecord>, Self::Error>> + Send + '_;

  /// List stays joined with their guests.
  fn list_stays(
    &self,
    filter: StayFilter,
  ) -> impl Future<Output = Result<Vec<StayRecord>, Self::Error>> + Send + '_;
}
