//! SQL schema for the playtest SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Plays are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- Every column but the identity ones may hold malformed values from older
-- tools; the decoder substitutes defaults per field.
CREATE TABLE IF NOT EXISTS plays (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,  -- append order
    play_id        TEXT NOT NULL UNIQUE,
    recorded_at    TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    player_count   TEXT,
    profile        TEXT,
    elements_json  TEXT,            -- JSON array of element names
    modules_json   TEXT,            -- JSON array of module names
    auxiliary_json TEXT             -- JSON object (winner, notes, players, ...)
);

PRAGMA user_version = 1;
";
