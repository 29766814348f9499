//! SQL schema for the vaxchain SQLite ledger.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per ledger key. A key that has no row reads as an empty value.
CREATE TABLE IF NOT EXISTS world_state (
    state_key   TEXT PRIMARY KEY,
    value       BLOB NOT NULL,
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC of the last write
);

PRAGMA user_version = 1;
";

/// Insert-or-replace for a single key.
pub const UPSERT: &str = "
INSERT INTO world_state (state_key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT (state_key) DO UPDATE SET
    value      = excluded.value,
    updated_at = excluded.updated_at
";
