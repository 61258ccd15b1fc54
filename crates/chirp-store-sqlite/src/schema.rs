//! SQL schema for the Chirp SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,  -- BINARY collation: exact, case-sensitive
    password_hash TEXT NOT NULL,         -- argon2 PHC string; never leaves the store layer
    created_at    TEXT NOT NULL          -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS posts (
    post_id    TEXT PRIMARY KEY,
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    like_count INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0)
);

-- Comments die with their post.
CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_created_idx    ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx    ON comments(post_id);
CREATE INDEX IF NOT EXISTS comments_created_idx ON comments(created_at);

PRAGMA user_version = 1;
";
