//! SQL schema for the Questlog SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    handle     TEXT NOT NULL UNIQUE,
    nickname   TEXT NOT NULL,
    level      INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
    exp        INTEGER NOT NULL DEFAULT 0 CHECK (exp >= 0),
    coins      INTEGER NOT NULL DEFAULT 0 CHECK (coins >= 0),
    hp         INTEGER NOT NULL DEFAULT 100,
    max_hp     INTEGER NOT NULL DEFAULT 100,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clans (
    clan_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clan_members (
    clan_id   TEXT NOT NULL REFERENCES clans(clan_id),
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    joined_at TEXT NOT NULL,
    UNIQUE (user_id)      -- a user belongs to at most one clan
);

CREATE TABLE IF NOT EXISTS tasks (
    task_id       TEXT PRIMARY KEY,
    text          TEXT NOT NULL,
    scope         TEXT NOT NULL,   -- 'personal' | 'clan' | 'system'
    owner_id      TEXT REFERENCES users(user_id),   -- set iff scope = 'personal'
    clan_id       TEXT REFERENCES clans(clan_id),   -- set iff scope = 'clan'
    repeat        TEXT NOT NULL,   -- 'one_shot' | 'every' | 'unlimited'
    cooldown_secs INTEGER,         -- set iff repeat = 'every'
    reward_exp    INTEGER NOT NULL,
    reward_coins  INTEGER NOT NULL,
    penalty       INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

-- Completions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS completions (
    completion_id  TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL REFERENCES users(user_id),
    task_id        TEXT NOT NULL REFERENCES tasks(task_id),
    completed_at   TEXT NOT NULL,  -- ISO 8601 UTC; server-assigned
    next_available TEXT,           -- informational; the gate recomputes
    exp_granted    INTEGER NOT NULL,
    coins_granted  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS completions_pair_idx ON completions(user_id, task_id, completed_at);
CREATE INDEX IF NOT EXISTS tasks_owner_idx      ON tasks(owner_id);
CREATE INDEX IF NOT EXISTS tasks_clan_idx       ON tasks(clan_id);

PRAGMA user_version = 1;
";
