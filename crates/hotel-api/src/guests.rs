//! Handlers for `/huespedes` endpoints.
//!
//! | Method   | Path              | Notes |
//! |----------|-------------------|-------|
//! | `GET`    | `/huespedes`      | Newest registration first |
//! | `GET`    | `/huespedes/:id`  | 404 if not found |
//! | `POST`   | `/huespedes`      | Body: [`GuestFields`]; returns 201 + id |
//! | `PUT`    | `/huespedes/:id`  | Body: [`GuestFields`]; replaces every field |
//! | `DELETE` | `/huespedes/:id`  | 400 while the guest has an active stay |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hotel_core::{
  guest::{Guest, GuestFields},
  store::FrontDeskStore,
};

use crate::{
  error::{ApiError, JsonBody, parse_id},
  reply::{Ack, Created},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /huespedes`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Guest>>, ApiError>
where
  S: FrontDeskStore,
{
  let guests = store.list_guests().await.map_err(ApiError::from_store)?;
  Ok(Json(guests))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /huespedes/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Guest>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  let guest = store
    .get_guest(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(hotel_core::Error::GuestNotFound(id))?;
  Ok(Json(guest))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /huespedes`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<GuestFields>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FrontDeskStore,
{
  let guest = store
    .create_guest(body.validate()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created::new(guest.id, "guest created"))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /huespedes/:id`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<GuestFields>,
) -> Result<Json<Ack>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  store
    .update_guest(id, body.validate()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Ack::new("guest updated")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /huespedes/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  store.delete_guest(id).await.map_err(ApiError::from_store)?;
  Ok(Json(Ack::new("guest deleted")))
}
