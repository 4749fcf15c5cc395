//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Calendar dates are stored as `YYYY-MM-DD`.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use hotel_core::{
  guest::Guest,
  stay::{GuestSummary, Stay, StayRecord, StayState},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Drop precision the column cannot hold, so values round-trip exactly.
pub fn stored(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── StayState ───────────────────────────────────────────────────────────────

pub fn encode_state(state: StayState) -> &'static str { state.into() }

pub fn decode_state(s: &str) -> Result<StayState> {
  StayState::from_str(s).map_err(|_| Error::UnknownState(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawGuest::from_row`].
pub const GUEST_COLUMNS: &str = "id, full_name, email, phone, document, \
                                 birth_date, nationality, created_at";

/// Raw values read directly from a `guests` row.
pub struct RawGuest {
  pub id:          i64,
  pub full_name:   String,
  pub email:       String,
  pub phone:       Option<String>,
  pub document:    String,
  pub birth_date:  Option<String>,
  pub nationality: Option<String>,
  pub created_at:  String,
}

impl RawGuest {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      full_name:   row.get(1)?,
      email:       row.get(2)?,
      phone:       row.get(3)?,
      document:    row.get(4)?,
      birth_date:  row.get(5)?,
      nationality: row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_guest(self) -> Result<Guest> {
    Ok(Guest {
      id:          self.id,
      full_name:   self.full_name,
      email:       self.email,
      phone:       self.phone,
      document:    self.document,
      birth_date:  self.birth_date.as_deref().map(decode_date).transpose()?,
      nationality: self.nationality,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Column list (prefixed with the `s` alias) matching [`RawStay::from_row`].
pub const STAY_COLUMNS: &str = "s.id, s.guest_id, s.room_number, s.room_type, \
                                s.checked_in_at, s.expected_checkout_at, \
                                s.checked_out_at, s.observations, \
                                s.amount_paid, s.state, s.created_at";

/// Raw values read directly from a `stays` row.
pub struct RawStay {
  pub id:                   i64,
  pub guest_id:             Option<i64>,
  pub room_number:          String,
  pub room_type:            String,
  pub checked_in_at:        String,
  pub expected_checkout_at: Option<String>,
  pub checked_out_at:       Option<String>,
  pub observations:         Option<String>,
  pub amount_paid:          Option<f64>,
  pub state:                String,
  pub created_at:           String,
}

impl RawStay {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      guest_id:             row.get(1)?,
      room_number:          row.get(2)?,
      room_type:            row.get(3)?,
      checked_in_at:        row.get(4)?,
      expected_checkout_at: row.get(5)?,
      checked_out_at:       row.get(6)?,
      observations:         row.get(7)?,
      amount_paid:          row.get(8)?,
      state:                row.get(9)?,
      created_at:           row.get(10)?,
    })
  }

  pub fn into_stay(self) -> Result<Stay> {
    Ok(Stay {
      id:                   self.id,
      guest_id:             self.guest_id,
      room_number:          self.room_number,
      room_type:            self.room_type,
      checked_in_at:        decode_dt(&self.checked_in_at)?,
      expected_checkout_at: decode_opt_dt(self.expected_checkout_at)?,
      checked_out_at:       decode_opt_dt(self.checked_out_at)?,
      observations:         self.observations,
      amount_paid:          self.amount_paid,
      state:                decode_state(&self.state)?,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

/// Guest identity columns appended after [`STAY_COLUMNS`] in stay listings.
pub const GUEST_SUMMARY_COLUMNS: &str = "g.full_name, g.email, g.phone, g.document";

/// A `stays` row left-joined with its guest's identity columns, all `NULL`
/// for a detached stay.
pub struct RawStayRecord {
  pub stay:      RawStay,
  pub full_name: Option<String>,
  pub email:     Option<String>,
  pub phone:     Option<String>,
  pub document:  Option<String>,
}

impl RawStayRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      stay:      RawStay::from_row(row)?,
      full_name: row.get(11)?,
      email:     row.get(12)?,
      phone:     row.get(13)?,
      document:  row.get(14)?,
    })
  }

  pub fn into_record(self) -> Result<StayRecord> {
    let guest = match (self.full_name, self.email, self.document) {
      (Some(full_name), Some(email), Some(document)) => Some(GuestSummary {
        full_name,
        email,
        phone: self.phone,
        document,
      }),
      _ => None,
    };
    Ok(StayRecord::new(self.stay.into_stay()?, guest))
  }
}
