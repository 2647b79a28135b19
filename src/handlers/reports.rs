use crate::error::TempleError;
use crate::handlers::local_now;
use crate::middleware::auth::AdminSession;
use crate::router::TempleState;
use crate::service::Report;
use crate::service::reports::{DashboardSummary, dashboard_summary, generate_report};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /api/reports/{kind} -> `{labels, values}`; unknown kinds are empty.
pub async fn report(
    State(state): State<TempleState>,
    _admin: AdminSession,
    Path(kind): Path<String>,
) -> Result<Json<Report>, TempleError> {
    let today = local_now().date();
    Ok(Json(generate_report(&state.storage, &kind, today).await?))
}

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<TempleState>,
    _admin: AdminSession,
) -> Result<Json<DashboardSummary>, TempleError> {
    let today = local_now().date();
    Ok(Json(dashboard_summary(&state.storage, today).await?))
}
