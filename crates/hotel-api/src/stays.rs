//! Handlers for `/registros` endpoints.
//!
//! | Method | Path                      | Notes |
//! |--------|---------------------------|-------|
//! | `GET`  | `/registros`              | Every stay, newest first |
//! | `GET`  | `/registros/activos`      | Active stays |
//! | `GET`  | `/registros/historial`    | Finalized stays, latest checkout first |
//! | `GET`  | `/registros/:id`          | One stay; 404 if not found |
//! | `POST` | `/registros`              | Check-in. Body: [`CheckInFields`] |
//! | `PUT`  | `/registros/:id`          | Body: [`StayUpdateFields`]; active stays only |
//! | `PUT`  | `/registros/:id/checkout` | Body: `{"total_pagado": ...}` (optional) |
//!
//! Every listing row is a [`StayRecord`]: the stay joined with its guest's
//! identity and the derived night count.

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use hotel_core::{
  stay::{CheckInFields, CheckoutFields, StayFilter, StayRecord, StayUpdateFields},
  store::FrontDeskStore,
};

use crate::{
  error::{ApiError, JsonBody, parse_id},
  reply::{Ack, CheckedOut, Created},
};

// ─── Listings ─────────────────────────────────────────────────────────────────

async fn listing<S>(
  store: &S,
  filter: StayFilter,
) -> Result<Json<Vec<StayRecord>>, ApiError>
where
  S: FrontDeskStore,
{
  let stays = store.list_stays(filter).await.map_err(ApiError::from_store)?;
  Ok(Json(stays))
}

/// `GET /registros`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<StayRecord>>, ApiError>
where
  S: FrontDeskStore,
{
  listing(store.as_ref(), StayFilter::All).await
}

/// `GET /registros/activos`
pub async fn list_active<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<StayRecord>>, ApiError>
where
  S: FrontDeskStore,
{
  listing(store.as_ref(), StayFilter::Active).await
}

/// `GET /registros/historial`
pub async fn list_history<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<StayRecord>>, ApiError>
where
  S: FrontDeskStore,
{
  listing(store.as_ref(), StayFilter::History).await
}

/// `GET /registros/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<StayRecord>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  let stay = store
    .get_stay(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(hotel_core::Error::StayNotFound(id))?;
  Ok(Json(stay))
}

// ─── Check-in ─────────────────────────────────────────────────────────────────

/// `POST /registros`
///
/// An unknown guest is the caller's mistake here, so it is a 400 rather
/// than a 404.
pub async fn check_in<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<CheckInFields>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FrontDeskStore,
{
  let new_stay = body.validate(Utc::now())?;
  let stay = store.create_stay(new_stay).await.map_err(|e| {
    let err: hotel_core::Error = e.into();
    match err {
      hotel_core::Error::GuestNotFound(id) => {
        ApiError::BadRequest(format!("guest {id} not found"))
      }
      other => ApiError::from(other),
    }
  })?;
  Ok((StatusCode::CREATED, Json(Created::new(stay.id, "check-in completed"))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /registros/:id`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<StayUpdateFields>,
) -> Result<Json<Ack>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  store
    .update_stay(id, body.validate()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Ack::new("stay updated")))
}

// ─── Checkout ─────────────────────────────────────────────────────────────────

/// `PUT /registros/:id/checkout`
///
/// The body may be omitted entirely; the total then defaults to zero.
pub async fn checkout<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<Json<CheckedOut>, ApiError>
where
  S: FrontDeskStore,
{
  let id = parse_id(&id)?;
  let amount = checkout_fields(&body)?.amount()?;
  let stay = store
    .checkout(id, amount)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(CheckedOut {
    success:        true,
    message:        "check-out completed",
    fecha_checkout: stay.checked_out_at,
  }))
}

/// An empty body means no total was sent.
fn checkout_fields(body: &[u8]) -> Result<CheckoutFields, ApiError> {
  if body.trim_ascii().is_empty() {
    return Ok(CheckoutFields::default());
  }
  serde_json::from_slice(body)
    .map_err(|e| ApiError::BadRequest(format!("invalid checkout body: {e}")))
}
