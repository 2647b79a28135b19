#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use temple_desk::db::{Devotee, NewDevotee};
use temple_desk::router::{TempleState, temple_router};
use temple_desk::{TempleStorage, VisitRecorder};
use tower::ServiceExt;

/// Fresh schema in a private in-memory database. One connection, kept
/// alive for the pool's lifetime, so every query sees the same database.
pub async fn memory_storage() -> TempleStorage {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(opts)
        .await
        .expect("open in-memory sqlite");
    let storage = TempleStorage::new(pool);
    storage.init_schema().await.expect("init schema");
    storage
}

pub async fn seeded_storage() -> TempleStorage {
    let storage = memory_storage().await;
    storage.seed_items().await.expect("seed items");
    storage
}

pub fn seeded_recorder(storage: &TempleStorage, seed: u64) -> VisitRecorder {
    VisitRecorder::new(storage.clone(), StdRng::seed_from_u64(seed))
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid timestamp")
}

pub fn new_devotee(devotee_id: &str, name: &str) -> NewDevotee {
    NewDevotee {
        devotee_id: devotee_id.to_string(),
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
    }
}

pub async fn insert_devotee(storage: &TempleStorage, devotee_id: &str, name: &str) -> Devotee {
    storage
        .insert_devotee(&new_devotee(devotee_id, name), at(2024, 1, 1, 9))
        .await
        .expect("insert devotee")
}

/// Insert `n` visits of `devotee_pk` at `when`, all for the first catalog item.
pub async fn insert_visits(storage: &TempleStorage, devotee_pk: i64, when: NaiveDateTime, n: usize) {
    let items = storage.list_items().await.expect("list items");
    let item = items.first().expect("catalog seeded");
    for _ in 0..n {
        storage
            .insert_visit(devotee_pk, item.id, when)
            .await
            .expect("insert visit");
    }
}

pub async fn test_app() -> (Router, TempleStorage) {
    let storage = seeded_storage().await;
    let recorder = seeded_recorder(&storage, 42);
    let state = TempleState::new(storage.clone(), recorder, Key::generate(), true);
    (temple_router(state), storage)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pairs from every `Set-Cookie` header, joined for a `Cookie` header.
    pub fn cookies(&self) -> String {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(request).await.expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not json")
    };
    TestResponse {
        status,
        headers,
        body,
    }
}
