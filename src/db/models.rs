use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plain password.
    pub password: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Devotee {
    pub id: i64,
    pub devotee_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDevotee {
    pub devotee_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Visit {
    pub id: i64,
    pub devotee_id: i64,
    pub item_id: i64,
    pub visit_date: NaiveDateTime,
}

/// One visit of a devotee, with the item name resolved.
#[derive(Debug, Clone, FromRow)]
pub struct DevoteeVisit {
    pub visit_date: NaiveDateTime,
    pub item: String,
}

/// A grouped count, e.g. visits per devotee name or per item name.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CountRow {
    pub label: String,
    pub count: i64,
}
