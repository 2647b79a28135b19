use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::db::User;
use crate::error::TempleError;
use crate::router::TempleState;

pub const SESSION_COOKIE: &str = "temple_session";
pub const LAST_PRINT_COOKIE: &str = "temple_last_print";

/// Reject every request with `SetupRequired` until an admin account exists.
pub async fn require_activation(
    State(state): State<TempleState>,
    req: Request,
    next: Next,
) -> Result<Response, TempleError> {
    if !state.storage.has_admin_account().await? {
        return Err(TempleError::SetupRequired);
    }
    Ok(next.run(req).await)
}

/// A logged-in admin, resolved from the private session cookie.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user: User,
}

impl FromRequestParts<TempleState> for AdminSession {
    type Rejection = TempleError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &TempleState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        let Some(user_id) = jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
        else {
            return Err(TempleError::Unauthorized);
        };

        match state.storage.find_user_by_id(user_id).await? {
            Some(user) if user.is_admin => Ok(Self { user }),
            _ => Err(TempleError::Unauthorized),
        }
    }
}

pub fn build_cookie(name: &str, value: String, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(12))
        .build()
}

pub fn clear_cookie(name: &str, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .build()
}

pub fn session_cookie(user: &User, insecure: bool) -> Cookie<'static> {
    build_cookie(SESSION_COOKIE, user.id.to_string(), insecure)
}

pub fn store_last_print(
    jar: PrivateCookieJar,
    value: String,
    insecure: bool,
) -> PrivateCookieJar {
    jar.add(build_cookie(LAST_PRINT_COOKIE, value, insecure))
}
