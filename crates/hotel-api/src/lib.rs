//! JSON REST API for the hotel front desk.
//!
//! Exposes an axum [`Router`] backed by any
//! [`hotel_core::store::FrontDeskStore`]. CORS, tracing and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hotel_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod guests;
pub mod reply;
pub mod status;
pub mod stays;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use hotel_core::store::FrontDeskStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FrontDeskStore + 'static,
{
  Router::new()
    // Guest directory
    .route("/huespedes", get(guests::list::<S>).post(guests::create::<S>))
    .route(
      "/huespedes/{id}",
      get(guests::get_one::<S>)
        .put(guests::update_one::<S>)
        .delete(guests::delete_one::<S>),
    )
    // Stay ledger
    .route("/registros", get(stays::list::<S>).post(stays::check_in::<S>))
    .route("/registros/activos", get(stays::list_active::<S>))
    .route("/registros/historial", get(stays::list_history::<S>))
    .route(
      "/registros/{id}",
      get(stays::get_one::<S>).put(stays::update_one::<S>),
    )
    .route("/registros/{id}/checkout", put(stays::checkout::<S>))
    // Liveness
    .route("/test", get(status::handler))
    .with_state(store)
}
