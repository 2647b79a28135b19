use crate::config::DEFAULT_ITEMS;
use crate::db::models::{CountRow, Devotee, DevoteeVisit, Item, NewDevotee, NewUser, User, Visit};
use crate::db::schema::SQLITE_INIT;
use crate::error::TempleError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct TempleStorage {
    pool: SqlitePool,
}

impl TempleStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, TempleError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), TempleError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert the default catalog when `items` is empty. Returns rows inserted.
    pub async fn seed_items(&self) -> Result<usize, TempleError> {
        let mut tx = self.pool.begin().await?;
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }
        for name in DEFAULT_ITEMS {
            sqlx::query("INSERT INTO items (name, description) VALUES (?, NULL)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(DEFAULT_ITEMS.len())
    }

    // ---- users ----

    pub async fn has_admin_account(&self) -> Result<bool, TempleError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE is_admin = 1 LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create_user(
        &self,
        user: NewUser,
        created_at: NaiveDateTime,
    ) -> Result<User, TempleError> {
        let id = sqlx::query(
            r#"INSERT INTO users (username, email, password, is_admin, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(truncate_to_seconds(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| TempleError::from_insert(e, "Username or email"))?
        .last_insert_rowid();

        self.find_user_by_id(id)
            .await?
            .ok_or_else(|| TempleError::Internal(format!("user {id} vanished after insert")))
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, TempleError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, is_admin, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, TempleError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, is_admin, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn user_email_taken(&self, email: &str) -> Result<bool, TempleError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    // ---- devotees ----

    pub async fn insert_devotee(
        &self,
        devotee: &NewDevotee,
        created_at: NaiveDateTime,
    ) -> Result<Devotee, TempleError> {
        let id = sqlx::query(
            r#"INSERT INTO devotees (devotee_id, name, phone, email, address, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&devotee.devotee_id)
        .bind(&devotee.name)
        .bind(&devotee.phone)
        .bind(&devotee.email)
        .bind(&devotee.address)
        .bind(truncate_to_seconds(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| TempleError::from_insert(e, format!("Devotee ID {}", devotee.devotee_id)))?
        .last_insert_rowid();

        let row = sqlx::query_as::<_, Devotee>(
            r#"SELECT id, devotee_id, name, phone, email, address, created_at
               FROM devotees WHERE id = ?"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_devotee_by_external_id(
        &self,
        devotee_id: &str,
    ) -> Result<Option<Devotee>, TempleError> {
        let row = sqlx::query_as::<_, Devotee>(
            r#"SELECT id, devotee_id, name, phone, email, address, created_at
               FROM devotees WHERE devotee_id = ?"#,
        )
        .bind(devotee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_devotees(&self) -> Result<Vec<Devotee>, TempleError> {
        let rows = sqlx::query_as::<_, Devotee>(
            r#"SELECT id, devotee_id, name, phone, email, address, created_at
               FROM devotees ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_devotees(&self) -> Result<i64, TempleError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devotees")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    // ---- items ----

    pub async fn list_items(&self) -> Result<Vec<Item>, TempleError> {
        let rows = sqlx::query_as::<_, Item>("SELECT id, name, description FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ---- visits ----

    /// Append one visit. A single INSERT, so the row lands whole or not at all.
    pub async fn insert_visit(
        &self,
        devotee_pk: i64,
        item_pk: i64,
        visit_date: NaiveDateTime,
    ) -> Result<Visit, TempleError> {
        let visit_date = truncate_to_seconds(visit_date);
        let id = sqlx::query("INSERT INTO visits (devotee_id, item_id, visit_date) VALUES (?, ?, ?)")
            .bind(devotee_pk)
            .bind(item_pk)
            .bind(visit_date)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Visit {
            id,
            devotee_id: devotee_pk,
            item_id: item_pk,
            visit_date,
        })
    }

    pub async fn count_visits(&self) -> Result<i64, TempleError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Visits whose calendar date lies in `[from, to]`.
    pub async fn count_visits_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, TempleError> {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM visits WHERE date(visit_date) BETWEEN ? AND ?")
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?;
        Ok(n)
    }

    /// Visits whose calendar date is on or after `from`.
    pub async fn count_visits_since(&self, from: NaiveDate) -> Result<i64, TempleError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits WHERE date(visit_date) >= ?")
            .bind(from)
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Visit counts per devotee, most visits first, at most `limit` rows.
    ///
    /// Returns the rows together with the total visit count, both read in
    /// one transaction.
    pub async fn top_devotees(&self, limit: i64) -> Result<(Vec<CountRow>, i64), TempleError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, CountRow>(
            r#"SELECT d.name AS label, COUNT(v.id) AS count
               FROM devotees d JOIN visits v ON v.devotee_id = d.id
               GROUP BY d.id
               ORDER BY count DESC, d.id ASC
               LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((rows, total))
    }

    /// Selection counts per item, most selected first.
    pub async fn item_distribution(&self) -> Result<Vec<CountRow>, TempleError> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"SELECT i.name AS label, COUNT(v.id) AS count
               FROM items i JOIN visits v ON v.item_id = i.id
               GROUP BY i.id
               ORDER BY count DESC, i.id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn visits_for_devotee(&self, devotee_pk: i64) -> Result<Vec<DevoteeVisit>, TempleError> {
        let rows = sqlx::query_as::<_, DevoteeVisit>(
            r#"SELECT v.visit_date AS visit_date, COALESCE(i.name, 'Unknown') AS item
               FROM visits v LEFT JOIN items i ON i.id = v.item_id
               WHERE v.devotee_id = ?
               ORDER BY v.visit_date, v.id"#,
        )
        .bind(devotee_pk)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}
