use crate::db::User;
use crate::error::TempleError;
use crate::handlers::local_now;
use crate::middleware::auth::{SESSION_COOKIE, clear_cookie, session_cookie};
use crate::router::TempleState;
use crate::service::accounts::{self, AdminSetupRequest, LoginRequest};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
        }
    }
}

/// GET /api/setup/status
pub async fn setup_status(State(state): State<TempleState>) -> Result<Json<Value>, TempleError> {
    let activated = state.storage.has_admin_account().await?;
    Ok(Json(json!({ "activated": activated })))
}

/// POST /api/setup -> creates the admin account once.
pub async fn setup(
    State(state): State<TempleState>,
    Json(req): Json<AdminSetupRequest>,
) -> Result<impl IntoResponse, TempleError> {
    let user = accounts::setup_admin(&state.storage, req, local_now()).await?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

/// POST /api/login
pub async fn login(
    State(state): State<TempleState>,
    jar: PrivateCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, TempleError> {
    let user = accounts::authenticate(&state.storage, req).await?;
    let jar = jar.add(session_cookie(&user, state.insecure_cookie));
    Ok((jar, Json(UserSummary::from(user))))
}

/// POST /api/logout
pub async fn logout(State(state): State<TempleState>, jar: PrivateCookieJar) -> impl IntoResponse {
    (
        jar.remove(clear_cookie(SESSION_COOKIE, state.insecure_cookie)),
        StatusCode::NO_CONTENT,
    )
}
