//! SQL schema for the IDM SQLite store.
//!
//! Executed once at connection startup.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per contract. The full contract (including id and metadata) lives
-- in `jsonb`; `id` is duplicated as a column for keyed access.
CREATE TABLE IF NOT EXISTS contracts (
    tenant  TEXT NOT NULL,
    id      TEXT NOT NULL,   -- hyphenated lowercase UUID
    jsonb   TEXT NOT NULL,
    PRIMARY KEY (tenant, id)
);

PRAGMA user_version = 1;
";
