//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and insert payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: `TempleStorage`, the query surface used by the services

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{CountRow, Devotee, DevoteeVisit, Item, NewDevotee, NewUser, User, Visit};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, TempleStorage};
