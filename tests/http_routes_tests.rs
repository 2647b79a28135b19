mod common;

use axum::http::StatusCode;
use common::{TestResponse, send, test_app};
use serde_json::json;

async fn activate(app: &axum::Router) {
    let resp = send(
        app,
        "POST",
        "/api/setup",
        None,
        Some(json!({
            "username": "priest",
            "email": "office@temple.org",
            "password": "secret1",
            "confirm_password": "secret1"
        })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
}

async fn login(app: &axum::Router) -> String {
    let resp = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "priest", "password": "secret1" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    resp.cookies()
}

fn error_code(resp: &TestResponse) -> &str {
    resp.body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn everything_waits_for_admin_setup() {
    let (app, _storage) = test_app().await;

    let status = send(&app, "GET", "/api/setup/status", None, None).await;
    assert_eq!(status.body, json!({ "activated": false }));

    let resp = send(&app, "POST", "/api/visits", None, Some(json!({ "devotee_id": "D-1" }))).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&resp), "SETUP_REQUIRED");

    activate(&app).await;
    let status = send(&app, "GET", "/api/setup/status", None, None).await;
    assert_eq!(status.body, json!({ "activated": true }));

    // second activation attempt is refused
    let resp = send(
        &app,
        "POST",
        "/api/setup",
        None,
        Some(json!({
            "username": "other",
            "email": "other@temple.org",
            "password": "secret2",
            "confirm_password": "secret2"
        })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(error_code(&resp), "ALREADY_ACTIVATED");
}

#[tokio::test]
async fn setup_validation_errors_are_reported() {
    let (app, _storage) = test_app().await;
    let resp = send(
        &app,
        "POST",
        "/api/setup",
        None,
        Some(json!({
            "username": "priest",
            "email": "office@temple.org",
            "password": "secret1",
            "confirm_password": "secret9"
        })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"]["message"], "Passwords must match");
}

#[tokio::test]
async fn admin_routes_require_login() {
    let (app, _storage) = test_app().await;
    activate(&app).await;

    for uri in ["/api/dashboard", "/api/devotees", "/api/reports/daily"] {
        let resp = send(&app, "GET", uri, None, None).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let resp = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "priest", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&resp), "INVALID_CREDENTIALS");

    let cookie = login(&app).await;
    let resp = send(&app, "GET", "/api/dashboard", Some(cookie.as_str()), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["total_visits"], 0);

    let logout = send(&app, "POST", "/api/logout", Some(cookie.as_str()), None).await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    let cleared = logout.cookies();
    let resp = send(&app, "GET", "/api/dashboard", Some(cleared.as_str()), None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn kiosk_flow_records_and_remembers_the_last_visit() {
    let (app, storage) = test_app().await;
    activate(&app).await;
    let admin = login(&app).await;

    let resp = send(
        &app,
        "POST",
        "/api/devotees",
        Some(admin.as_str()),
        Some(json!({ "devotee_id": "D-1", "name": "Meera", "phone": "12345" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
    assert_eq!(resp.body["devotee_id"], "D-1");

    let dup = send(
        &app,
        "POST",
        "/api/devotees",
        Some(admin.as_str()),
        Some(json!({ "devotee_id": "D-1", "name": "Again" })),
    )
    .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(error_code(&dup), "DUPLICATE_KEY");

    // nothing remembered yet for a fresh kiosk
    let last = send(&app, "GET", "/api/visits/last", None, None).await;
    assert_eq!(last.body, serde_json::Value::Null);

    let missing = send(&app, "POST", "/api/visits", None, Some(json!({ "devotee_id": "D-404" }))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(storage.count_visits().await.unwrap(), 0);

    let visit = send(&app, "POST", "/api/visits", None, Some(json!({ "devotee_id": "D-1" }))).await;
    assert_eq!(visit.status, StatusCode::OK, "{}", visit.body);
    assert_eq!(visit.body["devotee_name"], "Meera");
    let prn = visit.body["prn_template"].as_str().unwrap();
    assert!(prn.contains("B50,20,0,1,2,8,40,B,\"D-1\""));
    assert_eq!(storage.count_visits().await.unwrap(), 1);

    let kiosk = visit.cookies();
    let last = send(&app, "GET", "/api/visits/last", Some(kiosk.as_str()), None).await;
    assert_eq!(last.body, visit.body);

    let history = send(&app, "GET", "/api/devotees/D-1/visits", Some(admin.as_str()), None).await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body["devotee"]["name"], "Meera");
    assert_eq!(history.body["visits"][0]["item"], visit.body["item"]);

    let unknown = send(&app, "GET", "/api/devotees/D-404/visits", Some(admin.as_str()), None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_endpoint_shapes() {
    let (app, _storage) = test_app().await;
    activate(&app).await;
    let admin = login(&app).await;

    let daily = send(&app, "GET", "/api/reports/daily", Some(admin.as_str()), None).await;
    assert_eq!(daily.status, StatusCode::OK);
    assert_eq!(daily.body["labels"].as_array().unwrap().len(), 7);
    assert_eq!(daily.body["values"].as_array().unwrap().len(), 7);

    let monthly = send(&app, "GET", "/api/reports/monthly", Some(admin.as_str()), None).await;
    assert_eq!(monthly.body["labels"].as_array().unwrap().len(), 12);

    let yearly = send(&app, "GET", "/api/reports/yearly", Some(admin.as_str()), None).await;
    assert_eq!(yearly.body["labels"].as_array().unwrap().len(), 5);

    let devotees = send(&app, "GET", "/api/reports/devotees", Some(admin.as_str()), None).await;
    assert_eq!(devotees.body, json!({ "labels": ["Others"], "values": [0] }));

    let unknown = send(&app, "GET", "/api/reports/weekly", Some(admin.as_str()), None).await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(unknown.body, json!({ "labels": [], "values": [] }));
}
