//! SQL schema for the Petbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per (pet, owner) ownership interval. Rows are never updated:
-- closing an ownership deletes the current row and inserts a past one.
CREATE TABLE IF NOT EXISTS ownerships (
    record_id       TEXT PRIMARY KEY,
    pet_id          TEXT NOT NULL,
    owner_kind      TEXT NOT NULL
                    CHECK (owner_kind IN ('individual', 'organization')),
    owner_id        TEXT NOT NULL,
    status          TEXT NOT NULL
                    CHECK (status IN ('current', 'past')),
    start_date      TEXT,            -- RFC 3339 UTC, whole seconds
    end_date        TEXT,            -- RFC 3339 UTC; set iff status = 'past'
    transfer_reason TEXT
                    CHECK (transfer_reason IS NULL OR transfer_reason IN
                      ('adoption', 'surrender', 'rescue', 'sale', 'gift')),
    CHECK ((status = 'past') = (end_date IS NOT NULL))
);

-- At most one current owner per pet, enforced by the database itself.
CREATE UNIQUE INDEX IF NOT EXISTS ownerships_one_current_idx
    ON ownerships(pet_id) WHERE status = 'current';

CREATE INDEX IF NOT EXISTS ownerships_pet_idx   ON ownerships(pet_id);
CREATE INDEX IF NOT EXISTS ownerships_owner_idx ON ownerships(owner_kind, owner_id);

PRAGMA user_version = 1;
";
