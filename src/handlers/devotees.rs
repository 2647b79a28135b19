use crate::db::{Devotee, NewDevotee};
use crate::error::TempleError;
use crate::handlers::local_now;
use crate::middleware::auth::AdminSession;
use crate::router::TempleState;
use crate::service::devotees;
use crate::service::visits::{DevoteeHistory, devotee_history};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// GET /api/devotees
pub async fn list_devotees(
    State(state): State<TempleState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Devotee>>, TempleError> {
    Ok(Json(state.storage.list_devotees().await?))
}

/// POST /api/devotees
pub async fn add_devotee(
    State(state): State<TempleState>,
    _admin: AdminSession,
    Json(req): Json<NewDevotee>,
) -> Result<impl IntoResponse, TempleError> {
    let devotee = devotees::add_devotee(&state.storage, req, local_now()).await?;
    Ok((StatusCode::CREATED, Json(devotee)))
}

/// GET /api/devotees/{devotee_id}/visits
pub async fn devotee_visits(
    State(state): State<TempleState>,
    _admin: AdminSession,
    Path(devotee_id): Path<String>,
) -> Result<Json<DevoteeHistory>, TempleError> {
    Ok(Json(devotee_history(&state.storage, &devotee_id).await?))
}
