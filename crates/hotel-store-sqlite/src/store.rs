//! [`SqliteStore`]: the SQLite implementation of [`FrontDeskStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use hotel_core::{
  guest::{Guest, GuestId, NewGuest},
  stay::{NewStay, Stay, StayFilter, StayId, StayRecord, StayState, StayUpdate},
  store::FrontDeskStore,
};

use crate::{
  Result,
  encode::{
    GUEST_COLUMNS, GUEST_SUMMARY_COLUMNS, RawGuest, RawStay, RawStayRecord,
    STAY_COLUMNS, encode_date, encode_dt, encode_state, stored,
  },
  pool::{Pool, PoolOptions},
};

/// What a connection closure hands back: a database failure, or a domain
/// outcome decided inside the transaction.
type Outcome<T> = rusqlite::Result<hotel_core::Result<T>>;

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A front-desk store backed by a single SQLite file.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct SqliteStore {
  pool: Pool,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with the default pool sizing.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, PoolOptions::default()).await
  }

  /// Open (or create) a store at `path` with explicit pool sizing.
  pub async fn open_with(
    path: impl AsRef<Path>,
    options: PoolOptions,
  ) -> Result<Self> {
    let pool = Pool::open(path.as_ref(), options).await?;
    Ok(Self { pool })
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let acquire_timeout = PoolOptions::default().acquire_timeout;
    Self::open_in_memory_with_timeout(acquire_timeout).await
  }

  /// In-memory store whose single connection is waited on for at most
  /// `acquire_timeout`.
  pub async fn open_in_memory_with_timeout(
    acquire_timeout: Duration,
  ) -> Result<Self> {
    let pool = Pool::open_in_memory(acquire_timeout).await?;
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &Pool { &self.pool }

  /// Run a stay listing query with an optional filter and ordering.
  async fn query_stays(
    &self,
    condition: &'static str,
    order: &'static str,
    id: Option<StayId>,
  ) -> Result<Vec<StayRecord>> {
    let sql = format!(
      "SELECT {STAY_COLUMNS}, {GUEST_SUMMARY_COLUMNS}
       FROM stays s
       LEFT JOIN guests g ON g.id = s.guest_id
       {condition}
       ORDER BY {order}"
    );

    let raws: Vec<RawStayRecord> = self
      .pool
      .run(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match id {
          Some(id) => stmt.query_map(rusqlite::params![id], RawStayRecord::from_row)?,
          None => stmt.query_map([], RawStayRecord::from_row)?,
        }
        .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStayRecord::into_record).collect()
  }
}

// ─── FrontDeskStore impl ─────────────────────────────────────────────────────

impl FrontDeskStore for SqliteStore {
  type Error = crate::Error;

  // ── Guest directory ─────────────────────────────────────────────────────

  async fn list_guests(&self) -> Result<Vec<Guest>> {
    let raws: Vec<RawGuest> = self
      .pool
      .run(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GUEST_COLUMNS} FROM guests ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawGuest::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGuest::into_guest).collect()
  }

  async fn get_guest(&self, id: GuestId) -> Result<Option<Guest>> {
    let raw: Option<RawGuest> = self
      .pool
      .run(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = ?1"),
              rusqlite::params![id],
              RawGuest::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGuest::into_guest).transpose()
  }

  async fn create_guest(&self, guest: NewGuest) -> Result<Guest> {
    let created_at = stored(Utc::now());
    let at_str     = encode_dt(created_at);
    let birth_str  = guest.birth_date.map(encode_date);
    let input      = guest.clone();

    let id: GuestId = self
      .pool
      .run(move |conn| -> Outcome<GuestId> {
        let inserted = conn.execute(
          "INSERT INTO guests (
             full_name, email, phone, document, birth_date, nationality, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.full_name,
            input.email,
            input.phone,
            input.document,
            birth_str,
            input.nationality,
            at_str,
          ],
        );
        match inserted {
          Ok(_) => Ok(Ok(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => {
            Ok(Err(hotel_core::Error::DuplicateDocument(input.document)))
          }
          Err(e) => Err(e),
        }
      })
      .await??;

    tracing::info!(guest_id = id, "registered guest");

    Ok(Guest {
      id,
      full_name: guest.full_name,
      email: guest.email,
      phone: guest.phone,
      document: guest.document,
      birth_date: guest.birth_date,
      nationality: guest.nationality,
      created_at,
    })
  }

  async fn update_guest(&self, id: GuestId, guest: NewGuest) -> Result<()> {
    let birth_str = guest.birth_date.map(encode_date);

    self.pool.run(move |conn| -> Outcome<()> {
      let updated = conn.execute(
        "UPDATE guests SET
           full_name = ?1, email = ?2, phone = ?3, document = ?4,
           birth_date = ?5, nationality = ?6
         WHERE id = ?7",
        rusqlite::params![
          guest.full_name,
          guest.email,
          guest.phone,
          guest.document,
          birth_str,
          guest.nationality,
          id,
        ],
      );
      match updated {
        Ok(0) => Ok(Err(hotel_core::Error::GuestNotFound(id))),
        Ok(_) => Ok(Ok(())),
        Err(e) if is_unique_violation(&e) => {
          Ok(Err(hotel_core::Error::DuplicateDocument(guest.document)))
        }
        Err(e) => Err(e),
      }
    })
    .await??;

    Ok(())
  }

  async fn delete_guest(&self, id: GuestId) -> Result<()> {
    let detached: i64 = self
      .pool
      .run(move |conn| -> Outcome<i64> {
        // Write lock up front: no check-in may land between count and delete.
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let (active, finished): (i64, i64) = tx.query_row(
          "SELECT COALESCE(SUM(state = 'active'), 0),
                  COALESCE(SUM(state = 'finalized'), 0)
           FROM stays WHERE guest_id = ?1",
          rusqlite::params![id],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        if active > 0 {
          return Ok(Err(hotel_core::Error::GuestHasActiveStays(id)));
        }

        // Finished stays survive with `guest_id` set to NULL.
        let deleted =
          tx.execute("DELETE FROM guests WHERE id = ?1", rusqlite::params![id])?;
        if deleted == 0 {
          return Ok(Err(hotel_core::Error::GuestNotFound(id)));
        }

        tx.commit()?;
        Ok(Ok(finished))
      })
      .await??;

    tracing::info!(guest_id = id, detached_stays = detached, "deleted guest");
    Ok(())
  }

  // ── Stay ledger ─────────────────────────────────────────────────────────

  async fn create_stay(&self, mut stay: NewStay) -> Result<Stay> {
    stay.checked_in_at        = stored(stay.checked_in_at);
    stay.expected_checkout_at = stay.expected_checkout_at.map(stored);

    let created_at       = stored(Utc::now());
    let created_str      = encode_dt(created_at);
    let checked_in_str   = encode_dt(stay.checked_in_at);
    let expected_str     = stay.expected_checkout_at.map(encode_dt);
    let active_str       = encode_state(StayState::Active);
    let input            = stay.clone();

    let id: StayId = self
      .pool
      .run(move |conn| -> Outcome<StayId> {
        // IMMEDIATE takes the write lock before the occupancy check, so the
        // check and the insert cannot interleave with another check-in.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let guest_exists = tx
          .query_row(
            "SELECT 1 FROM guests WHERE id = ?1",
            rusqlite::params![input.guest_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !guest_exists {
          return Ok(Err(hotel_core::Error::GuestNotFound(input.guest_id)));
        }

        let occupied = tx
          .query_row(
            "SELECT id FROM stays WHERE room_number = ?1 AND state = 'active'",
            rusqlite::params![input.room_number],
            |r| r.get::<_, i64>(0),
          )
          .optional()?
          .is_some();
        if occupied {
          return Ok(Err(hotel_core::Error::RoomOccupied(input.room_number)));
        }

        let inserted = tx.execute(
          "INSERT INTO stays (
             guest_id, room_number, room_type, checked_in_at,
             expected_checkout_at, observations, state, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            input.guest_id,
            input.room_number,
            input.room_type,
            checked_in_str,
            expected_str,
            input.observations,
            active_str,
            created_str,
          ],
        );
        match inserted {
          Ok(_) => {}
          // The partial unique index is the last word on occupancy.
          Err(e) if is_unique_violation(&e) => {
            return Ok(Err(hotel_core::Error::RoomOccupied(input.room_number)));
          }
          Err(e) => return Err(e),
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::info!(
      stay_id = id,
      guest_id = stay.guest_id,
      room = %stay.room_number,
      "checked in"
    );

    Ok(Stay {
      id,
      guest_id: Some(stay.guest_id),
      room_number: stay.room_number,
      room_type: stay.room_type,
      checked_in_at: stay.checked_in_at,
      expected_checkout_at: stay.expected_checkout_at,
      checked_out_at: None,
      observations: stay.observations,
      amount_paid: None,
      state: StayState::Active,
      created_at,
    })
  }

  async fn checkout(&self, id: StayId, amount_paid: f64) -> Result<Stay> {
    let at_str        = encode_dt(Utc::now());
    let finalized_str = encode_state(StayState::Finalized);

    let raw: RawStay = self
      .pool
      .run(move |conn| -> Outcome<RawStay> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Conditioned on `active`: a finalized stay is never touched again.
        let updated = tx.execute(
          "UPDATE stays SET
             checked_out_at = ?1, state = ?2, amount_paid = ?3
           WHERE id = ?4 AND state = 'active'",
          rusqlite::params![at_str, finalized_str, amount_paid, id],
        )?;
        if updated == 0 {
          return Ok(Err(hotel_core::Error::StayNotActive(id)));
        }

        let raw = tx.query_row(
          &format!("SELECT {STAY_COLUMNS} FROM stays s WHERE s.id = ?1"),
          rusqlite::params![id],
          RawStay::from_row,
        )?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    let stay = raw.into_stay()?;
    tracing::info!(stay_id = id, room = %stay.room_number, amount_paid, "checked out");
    Ok(stay)
  }

  async fn update_stay(&self, id: StayId, update: StayUpdate) -> Result<()> {
    self.pool.run(move |conn| -> Outcome<()> {
      let updated = conn.execute(
        "UPDATE stays SET
           room_number = ?1, room_type = ?2, observations = ?3
         WHERE id = ?4 AND state = 'active'",
        rusqlite::params![
          update.room_number,
          update.room_type,
          update.observations,
          id,
        ],
      );
      match updated {
        Ok(0) => Ok(Err(hotel_core::Error::StayNotActive(id))),
        Ok(_) => Ok(Ok(())),
        // Moved onto a room another active stay holds.
        Err(e) if is_unique_violation(&e) => {
          Ok(Err(hotel_core::Error::RoomOccupied(update.room_number)))
        }
        Err(e) => Err(e),
      }
    })
    .await??;

    Ok(())
  }

  async fn get_stay(&self, id: StayId) -> Result<Option<StayRecord>> {
    let mut records = self
      .query_stays("WHERE s.id = ?1", "s.id", Some(id))
      .await?;
    Ok(records.pop())
  }

  async fn list_stays(&self, filter: StayFilter) -> Result<Vec<StayRecord>> {
    let (condition, order) = match filter {
      StayFilter::All => ("", "s.created_at DESC, s.id DESC"),
      StayFilter::Active => {
        ("WHERE s.state = 'active'", "s.created_at DESC, s.id DESC")
      }
      StayFilter::History => {
        ("WHERE s.state = 'finalized'", "s.checked_out_at DESC, s.id DESC")
      }
    };
    self.query_stays(condition, order, None).await
  }
}
