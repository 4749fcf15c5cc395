//! SQL schema for the front-desk SQLite store.
//!
//! Executed once when the pool opens. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS guests (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name    TEXT NOT NULL,
    email        TEXT NOT NULL,
    phone        TEXT,
    document     TEXT NOT NULL UNIQUE,   -- identity document number
    birth_date   TEXT,                   -- YYYY-MM-DD
    nationality  TEXT,
    created_at   TEXT NOT NULL           -- RFC 3339 UTC; server-assigned
);

-- Stays are never deleted. Deleting a guest detaches their finished stays.
CREATE TABLE IF NOT EXISTS stays (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    guest_id             INTEGER
                         REFERENCES guests(id) ON DELETE SET NULL,
    room_number          TEXT NOT NULL,
    room_type            TEXT NOT NULL,
    checked_in_at        TEXT NOT NULL,
    expected_checkout_at TEXT,
    checked_out_at       TEXT,
    observations         TEXT,
    amount_paid          REAL,           -- NULL while active
    state                TEXT NOT NULL DEFAULT 'active'
                         CHECK (state IN ('active', 'finalized')),
    created_at           TEXT NOT NULL
);

-- At most one active stay per room, enforced by the store itself.
CREATE UNIQUE INDEX IF NOT EXISTS stays_active_room_idx
    ON stays(room_number) WHERE state = 'active';

CREATE INDEX IF NOT EXISTS stays_guest_idx   ON stays(guest_id);
CREATE INDEX IF NOT EXISTS stays_state_idx   ON stays(state);
CREATE INDEX IF NOT EXISTS guests_created_idx ON guests(created_at);

PRAGMA user_version = 1;
";

/// Per-connection settings; `foreign_keys` does not persist in the file.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";
