//! SQL schema for the MediChannel SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Created at signup; never updated or deleted.
CREATE TABLE IF NOT EXISTS profiles (
    actor_id    TEXT PRIMARY KEY,
    full_name   TEXT NOT NULL,
    avatar_url  TEXT,
    created_at  TEXT NOT NULL   -- RFC 3339 UTC, fixed width so it sorts
);

-- Rows are inserted and deleted, never updated.
-- Uniqueness per actor is kept by replace_role, not by a constraint.
CREATE TABLE IF NOT EXISTS user_roles (
    assignment_id TEXT PRIMARY KEY,
    actor_id      TEXT NOT NULL REFERENCES profiles(actor_id),
    role          TEXT NOT NULL
                  CHECK (role IN ('patient', 'attendant', 'manager'))
);

CREATE TABLE IF NOT EXISTS credentials (
    actor_id      TEXT PRIMARY KEY REFERENCES profiles(actor_id),
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

-- Only the SHA-256 digest of a bearer token is stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    actor_id     TEXT NOT NULL REFERENCES profiles(actor_id),
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS user_roles_actor_idx  ON user_roles(actor_id);
CREATE INDEX IF NOT EXISTS profiles_created_idx  ON profiles(created_at);

PRAGMA user_version = 1;
";
