use crate::error::TempleError;
use crate::handlers::local_now;
use crate::middleware::auth::{LAST_PRINT_COOKIE, store_last_print};
use crate::router::TempleState;
use crate::service::PrintData;
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecordVisitRequest {
    pub devotee_id: String,
}

/// POST /api/visits -> records a visit and remembers it for this client.
pub async fn record_visit(
    State(state): State<TempleState>,
    jar: PrivateCookieJar,
    Json(req): Json<RecordVisitRequest>,
) -> Result<impl IntoResponse, TempleError> {
    let recorded = state
        .recorder
        .record(req.devotee_id.trim(), local_now())
        .await?;

    let encoded = serde_json::to_string(&recorded.print)
        .map_err(|e| TempleError::Internal(format!("encode print data: {e}")))?;
    let jar = store_last_print(jar, encoded, state.insecure_cookie);
    Ok((jar, Json(recorded.print)))
}

/// GET /api/visits/last -> the last visit recorded by this client, or null.
pub async fn last_visit(jar: PrivateCookieJar) -> Json<Option<PrintData>> {
    let last = jar
        .get(LAST_PRINT_COOKIE)
        .and_then(|c| serde_json::from_str::<PrintData>(c.value()).ok());
    Json(last)
}
