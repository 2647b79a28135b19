use crate::db::TempleStorage;
use crate::handlers::{auth, devotees, reports, visits};
use crate::middleware::auth::require_activation;
use crate::service::VisitRecorder;
use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

#[derive(Clone)]
pub struct TempleState {
    pub storage: TempleStorage,
    pub recorder: VisitRecorder,
    pub insecure_cookie: bool,
    cookie_key: Key,
}

impl TempleState {
    pub fn new(
        storage: TempleStorage,
        recorder: VisitRecorder,
        cookie_key: Key,
        insecure_cookie: bool,
    ) -> Self {
        Self {
            storage,
            recorder,
            insecure_cookie,
            cookie_key,
        }
    }
}

impl FromRef<TempleState> for Key {
    fn from_ref(state: &TempleState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn temple_router(state: TempleState) -> Router {
    let setup = Router::new()
        .route("/api/setup/status", get(auth::setup_status))
        .route("/api/setup", post(auth::setup));

    // everything below is unreachable until the admin account exists
    let activated = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/visits", post(visits::record_visit))
        .route("/api/visits/last", get(visits::last_visit))
        .route("/api/dashboard", get(reports::dashboard))
        .route(
            "/api/devotees",
            get(devotees::list_devotees).post(devotees::add_devotee),
        )
        .route(
            "/api/devotees/{devotee_id}/visits",
            get(devotees::devotee_visits),
        )
        .route("/api/reports/{kind}", get(reports::report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_activation,
        ));

    setup.merge(activated).with_state(state)
}
