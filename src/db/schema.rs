//! SQL DDL for initializing the temple record store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users`: admin accounts, `username` and `email` UNIQUE
/// - `devotees`: registered visitors, external `devotee_id` UNIQUE
/// - `items`: the prasad catalog
/// - `visits`: append-only log referencing `devotees.id` and `items.id`
/// - `visit_date` stored as local time text (`YYYY-MM-DD HH:MM:SS`)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL, -- bcrypt hash
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS devotees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    devotee_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    phone TEXT NULL,
    email TEXT NULL,
    address TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NULL
);

CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    devotee_id INTEGER NOT NULL REFERENCES devotees(id),
    item_id INTEGER NOT NULL REFERENCES items(id),
    visit_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_visits_devotee_id ON visits(devotee_id);
CREATE INDEX IF NOT EXISTS idx_visits_item_id ON visits(item_id);
CREATE INDEX IF NOT EXISTS idx_visits_visit_date ON visits(visit_date);
"#;
