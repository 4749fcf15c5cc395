//! Guest: the identity record a stay points at.
//!
//! Serialised field names match the JSON the front-desk UI already speaks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  input::{optional, parse_date, required},
};

pub type GuestId = i64;

/// A registered guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
  pub id:          GuestId,
  #[serde(rename = "nombre")]
  pub full_name:   String,
  pub email:       String,
  #[serde(rename = "telefono")]
  pub phone:       Option<String>,
  /// Passport or national ID number; unique across all guests.
  #[serde(rename = "documento_identidad")]
  pub document:    String,
  #[serde(rename = "fecha_nacimiento")]
  pub birth_date:  Option<NaiveDate>,
  #[serde(rename = "nacionalidad")]
  pub nationality: Option<String>,
  /// Server-assigned; never changes after registration.
  pub created_at:  DateTime<Utc>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Guest fields exactly as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestFields {
  #[serde(rename = "nombre")]
  pub full_name:   Option<String>,
  pub email:       Option<String>,
  #[serde(rename = "telefono")]
  pub phone:       Option<String>,
  #[serde(rename = "documento_identidad")]
  pub document:    Option<String>,
  #[serde(rename = "fecha_nacimiento")]
  pub birth_date:  Option<String>,
  #[serde(rename = "nacionalidad")]
  pub nationality: Option<String>,
}

impl GuestFields {
  /// Check required fields and normalise blanks to `None`.
  pub fn validate(self) -> Result<NewGuest> {
    let full_name = required("nombre", self.full_name)?;
    let email = required("email", self.email)?;
    let document = required("documento_identidad", self.document)?;
    let birth_date = optional(self.birth_date)
      .map(|d| parse_date("fecha_nacimiento", &d))
      .transpose()?;

    Ok(NewGuest {
      full_name,
      email,
      phone: optional(self.phone),
      document,
      birth_date,
      nationality: optional(self.nationality),
    })
  }
}

/// Validated input to
/// [`FrontDeskStore::create_guest`](crate::store::FrontDeskStore::create_guest)
/// and [`FrontDeskStore::update_guest`](crate::store::FrontDeskStore::update_guest).
#[derive(Debug, Clone, PartialEq)]
pub struct NewGuest {
  pub full_name:   String,
  pub email:       String,
  pub phone:       Option<String>,
  pub document:    String,
  pub birth_date:  Option<NaiveDate>,
  pub nationality: Option<String>,
}

impl NewGuest {
  /// Convenience constructor with the optional fields left empty.
  pub fn new(
    full_name: impl Into<String>,
    email: impl Into<String>,
    document: impl Into<String>,
  ) -> Self {
    Self {
      full_name:   full_name.into(),
      email:       email.into(),
      phone:       None,
      document:    document.into(),
      birth_date:  None,
      nationality: None,
    }
  }
}
