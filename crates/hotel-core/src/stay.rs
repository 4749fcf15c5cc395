//! Stays: one guest's occupancy of one room.
//!
//! A stay is born [`StayState::Active`] by a check-in and moves exactly once
//! to [`StayState::Finalized`] by a checkout. Finalized is terminal; while
//! active only the room, room type and observations may change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  guest::GuestId,
  input::{optional, parse_timestamp, required},
};

pub type StayId = i64;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ─── State ───────────────────────────────────────────────────────────────────

/// Occupancy state. The store column uses the snake_case strum form
/// (`active`); the wire uses the UI's words (`activo`).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StayState {
  #[serde(rename = "activo")]
  Active,
  #[serde(rename = "finalizado")]
  Finalized,
}

impl StayState {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

// ─── Stay ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
  pub id:                   StayId,
  /// `None` once the guest has been deleted; the stay itself is kept.
  #[serde(rename = "huesped_id")]
  pub guest_id:             Option<GuestId>,
  #[serde(rename = "numero_habitacion")]
  pub room_number:          String,
  #[serde(rename = "tipo_habitacion")]
  pub room_type:            String,
  #[serde(rename = "fecha_checkin")]
  pub checked_in_at:        DateTime<Utc>,
  /// Departure announced at check-in, if any.
  #[serde(rename = "fecha_checkout_estimada")]
  pub expected_checkout_at: Option<DateTime<Utc>>,
  /// Stamped by checkout.
  #[serde(rename = "fecha_checkout")]
  pub checked_out_at:       Option<DateTime<Utc>>,
  #[serde(rename = "observaciones")]
  pub observations:         Option<String>,
  /// `None` until checkout.
  #[serde(rename = "total_pagado")]
  pub amount_paid:          Option<f64>,
  #[serde(rename = "estado")]
  pub state:                StayState,
  pub created_at:           DateTime<Utc>,
}

impl Stay {
  /// Nights billed so far: up to the actual checkout when finalized, else up
  /// to the expected checkout. `None` when neither bound is known.
  pub fn nights(&self) -> Option<i64> {
    let until = self.checked_out_at.or(self.expected_checkout_at)?;
    nights(self.checked_in_at, until).ok()
  }
}

/// Number of nights between check-in and checkout, rounded up to whole days.
///
/// Fails with [`Error::CheckoutNotAfterCheckin`] unless `check_out` is
/// strictly later than `check_in`.
pub fn nights(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<i64> {
  if check_out <= check_in {
    return Err(Error::CheckoutNotAfterCheckin);
  }
  let millis = (check_out - check_in).num_milliseconds();
  Ok((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY)
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// The guest identity fields shown next to a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestSummary {
  #[serde(rename = "nombre")]
  pub full_name: String,
  pub email:     String,
  #[serde(rename = "telefono")]
  pub phone:     Option<String>,
  #[serde(rename = "documento_identidad")]
  pub document:  String,
}

/// A stay joined with its guest; the row shape of every stay listing.
///
/// `guest` is `None` for the history of a guest who has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayRecord {
  #[serde(flatten)]
  pub stay:   Stay,
  #[serde(flatten)]
  pub guest:  Option<GuestSummary>,
  #[serde(rename = "noches")]
  pub nights: Option<i64>,
}

impl StayRecord {
  pub fn new(stay: Stay, guest: Option<GuestSummary>) -> Self {
    let nights = stay.nights();
    Self { stay, guest, nights }
  }
}

/// Which stays a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StayFilter {
  /// Every stay, newest first.
  #[default]
  All,
  /// Active stays only, newest first.
  Active,
  /// Finalized stays only, most recent checkout first.
  History,
}

// ─── Check-in ────────────────────────────────────────────────────────────────

/// Check-in fields exactly as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInFields {
  #[serde(rename = "huesped_id")]
  pub guest_id:             Option<GuestId>,
  #[serde(rename = "numero_habitacion")]
  pub room_number:          Option<String>,
  #[serde(rename = "tipo_habitacion")]
  pub room_type:            Option<String>,
  #[serde(rename = "fecha_checkin")]
  pub checked_in_at:        Option<String>,
  #[serde(rename = "fecha_checkout_estimada")]
  pub expected_checkout_at: Option<String>,
  #[serde(rename = "observaciones")]
  pub observations:         Option<String>,
}

impl CheckInFields {
  /// Validate the submission. A missing check-in time defaults to `now`.
  pub fn validate(self, now: DateTime<Utc>) -> Result<NewStay> {
    let guest_id = self
      .guest_id
      .filter(|id| *id > 0)
      .ok_or(Error::MissingField("huesped_id"))?;
    let room_number = required("numero_habitacion", self.room_number)?;
    let room_type = required("tipo_habitacion", self.room_type)?;

    let checked_in_at = optional(self.checked_in_at)
      .map(|s| parse_timestamp("fecha_checkin", &s))
      .transpose()?
      .unwrap_or(now);
    let expected_checkout_at = optional(self.expected_checkout_at)
      .map(|s| parse_timestamp("fecha_checkout_estimada", &s))
      .transpose()?;

    if let Some(until) = expected_checkout_at {
      nights(checked_in_at, until)?;
    }

    Ok(NewStay {
      guest_id,
      room_number,
      room_type,
      checked_in_at,
      expected_checkout_at,
      observations: optional(self.observations),
    })
  }
}

/// Validated input to
/// [`FrontDeskStore::create_stay`](crate::store::FrontDeskStore::create_stay).
#[derive(Debug, Clone, PartialEq)]
pub struct NewStay {
  pub guest_id:             GuestId,
  pub room_number:          String,
  pub room_type:            String,
  pub checked_in_at:        DateTime<Utc>,
  pub expected_checkout_at: Option<DateTime<Utc>>,
  pub observations:         Option<String>,
}

impl NewStay {
  /// Convenience constructor: no expected checkout, no observations.
  pub fn new(
    guest_id: GuestId,
    room_number: impl Into<String>,
    room_type: impl Into<String>,
    checked_in_at: DateTime<Utc>,
  ) -> Self {
    Self {
      guest_id,
      room_number: room_number.into(),
      room_type: room_type.into(),
      checked_in_at,
      expected_checkout_at: None,
      observations: None,
    }
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StayUpdateFields {
  #[serde(rename = "numero_habitacion")]
  pub room_number:  Option<String>,
  #[serde(rename = "tipo_habitacion")]
  pub room_type:    Option<String>,
  #[serde(rename = "observaciones")]
  pub observations: Option<String>,
}

impl StayUpdateFields {
  pub fn validate(self) -> Result<StayUpdate> {
    Ok(StayUpdate {
      room_number:  required("numero_habitacion", self.room_number)?,
      room_type:    required("tipo_habitacion", self.room_type)?,
      observations: optional(self.observations),
    })
  }
}

/// The metadata an active stay may change.
#[derive(Debug, Clone, PartialEq)]
pub struct StayUpdate {
  pub room_number:  String,
  pub room_type:    String,
  pub observations: Option<String>,
}

// ─── Checkout ────────────────────────────────────────────────────────────────

/// The UI sends the total either as a JSON number or as the raw text of a
/// prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
  Number(f64),
  Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutFields {
  #[serde(rename = "total_pagado", default)]
  pub amount_paid: Option<AmountInput>,
}

impl CheckoutFields {
  /// The amount to record; absent or blank means zero.
  pub fn amount(self) -> Result<f64> {
    let amount = match self.amount_paid {
      None => return Ok(0.0),
      Some(AmountInput::Number(n)) => n,
      Some(AmountInput::Text(text)) => match optional(Some(text)) {
        None => return Ok(0.0),
        Some(t) => t.parse().map_err(|_| Error::InvalidAmount(t))?,
      },
    };
    if !amount.is_finite() || amount < 0.0 {
      return Err(Error::InvalidAmount(amount.to_string()));
    }
    Ok(amount)
  }
}
