use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use gym_tracker::config::{Config, Mode};
use gym_tracker::reconcile::ReconcilePolicy;
use gym_tracker::{router, AppState, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    test_app_with(Config::default())
}

fn test_app_with(config: Config) -> Router {
    router(AppState::new(config, Arc::new(MemoryStore::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = test_app();
    let (status, body) = send_json(&app, "GET", "/gym/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn fresh_store_lists_no_logs() {
    let app = test_app();
    let (status, body) = send_json(&app, "GET", "/gym/api/logs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "logs": {} }));

    let (_, body) = send_json(&app, "GET", "/gym/api/weights", None).await;
    assert_eq!(body, json!({ "weights": [] }));
}

#[tokio::test]
async fn missing_entry_is_null_not_an_error() {
    let app = test_app();
    let (status, body) = send_json(&app, "GET", "/gym/api/logs/2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "entry": null }));
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let app = test_app();
    let (status, body) = send_json(
        &app,
        "PUT",
        "/gym/api/logs/2024-03-04",
        Some(json!({ "weight": 182, "notes": "felt strong" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "entry": { "date": "2024-03-04", "weight": 182, "notes": "felt strong" } })
    );

    let (status, body) = send_json(&app, "GET", "/gym/api/logs/2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "entry": { "date": "2024-03-04", "weight": 182, "notes": "felt strong" } })
    );
}

#[tokio::test]
async fn path_date_overrides_payload_date() {
    let app = test_app();
    send_json(
        &app,
        "PUT",
        "/gym/api/logs/2024-03-04",
        Some(json!({ "date": "1999-12-31", "weight": 150 })),
    )
    .await;

    let (_, body) = send_json(&app, "GET", "/gym/api/logs/2024-03-04", None).await;
    assert_eq!(body["entry"]["date"], "2024-03-04");
    assert_eq!(body["entry"]["weight"], 150);

    let (_, body) = send_json(&app, "GET", "/gym/api/logs/1999-12-31", None).await;
    assert_eq!(body, json!({ "entry": null }));
}

#[tokio::test]
async fn put_replaces_rather_than_merges() {
    let app = test_app();
    let uri = "/gym/api/logs/2024-03-04";
    send_json(&app, "PUT", uri, Some(json!({ "weight": 182, "notes": "am" }))).await;
    send_json(&app, "PUT", uri, Some(json!({ "notes": "pm" }))).await;

    let (_, body) = send_json(&app, "GET", uri, None).await;
    assert_eq!(body, json!({ "entry": { "date": "2024-03-04", "notes": "pm" } }));
}

#[tokio::test]
async fn full_client_entry_is_echoed_through() {
    let app = test_app();
    let entry = json!({
        "weight": "181.4",
        "workouts": {
            "Plank": [
                { "set": 1, "reps": "45", "weight": "" },
                { "set": 2, "reps": "40", "weight": "" }
            ]
        },
        "cardio": { "completed": false, "steps": "", "notes": "" },
        "notes": "",
        "energy": 7
    });
    let (_, body) = send_json(&app, "PUT", "/gym/api/logs/2024-03-04", Some(entry.clone())).await;

    let mut expected = entry;
    expected["date"] = json!("2024-03-04");
    assert_eq!(body["entry"], expected);

    let (_, body) = send_json(&app, "GET", "/gym/api/logs", None).await;
    assert_eq!(body["logs"]["2024-03-04"], expected);
}

#[tokio::test]
async fn weights_are_sorted_and_skip_blanks() {
    let app = test_app();
    send_json(&app, "PUT", "/gym/api/logs/2024-02-01", Some(json!({ "weight": 140 }))).await;
    send_json(&app, "PUT", "/gym/api/logs/2024-01-15", Some(json!({ "weight": 142 }))).await;
    send_json(&app, "PUT", "/gym/api/logs/2024-01-20", Some(json!({ "weight": "" }))).await;
    send_json(&app, "PUT", "/gym/api/logs/2024-01-21", Some(json!({ "notes": "no scale" }))).await;

    let (status, body) = send_json(&app, "GET", "/gym/api/weights", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "weights": [
            { "date": "2024-01-15", "weight": 142 },
            { "date": "2024-02-01", "weight": 140 }
        ] })
    );
}

#[tokio::test]
async fn invalid_dates_are_rejected() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/gym/api/logs/not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "PUT", "/gym/api/logs/2024-13-01", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/gym/api/days/2024-02-30", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn day_view_returns_prescription_and_reconciled_form() {
    let app = test_app();
    send_json(
        &app,
        "PUT",
        "/gym/api/logs/2024-03-04",
        Some(json!({
            "weight": 182,
            "workouts": {
                "Plank": [{ "set": 3, "reps": "45", "weight": "" }],
                "Retired Exercise": [{ "set": 1, "reps": "8", "weight": "95" }]
            }
        })),
    )
    .await;

    let (status, body) = send_json(&app, "GET", "/gym/api/days/2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment"], json!({ "type": "lifting", "key": "A" }));
    assert_eq!(body["workout"]["name"], "Workout A (Monday)");
    assert_eq!(body["hasEntry"], true);
    let form = &body["form"];
    assert_eq!(form["weight"], 182);
    assert_eq!(form["notes"], "");
    assert_eq!(form["cardio"], json!({ "completed": false, "steps": "", "notes": "" }));
    assert_eq!(form["workouts"]["Plank"], json!([{ "set": 1, "reps": "45", "weight": "" }]));
    assert_eq!(form["workouts"]["Smith Machine Squats"].as_array().unwrap().len(), 3);
    assert!(form["workouts"].get("Retired Exercise").is_none());

    let (_, body) = send_json(&app, "GET", "/gym/api/days/2024-03-05", None).await;
    assert_eq!(body["assignment"], json!({ "type": "cardio" }));
    assert_eq!(body["workout"], Value::Null);
    assert_eq!(body["hasEntry"], false);
    assert_eq!(body["form"]["workouts"], json!({}));
}

#[tokio::test]
async fn plan_endpoint_serves_the_catalog() {
    let app = test_app();
    let (status, body) = send_json(&app, "GET", "/gym/api/plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The WFH Dad Recomp");
    assert_eq!(body["workouts"].as_array().unwrap().len(), 3);
    assert_eq!(body["weekdayLabels"][0], "Sun");
    assert!(body["nutrition"]["batchPrep"].is_array());
}

#[tokio::test]
async fn page_is_served_at_the_base_path() {
    let app = test_app();
    let (status, bytes) = send(&app, "GET", "/gym", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("<title>The WFH Dad Recomp</title>"));
    assert!(html.contains(r#""basePath":"/gym""#));
}

#[tokio::test]
async fn root_base_path_mounts_api_at_root() {
    let app = test_app_with(Config {
        base_path: String::new(),
        ..Config::default()
    });
    let (status, body) = send_json(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    let (status, _) = send(&app, "GET", "/gym/api/health", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn development_mode_allows_cross_origin_requests() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/gym/api/logs/2024-03-04")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn production_mode_serves_client_routes_without_cors() {
    let app = test_app_with(Config {
        mode: Mode::Production,
        ..Config::default()
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/gym/history/2024-03-04")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

    let (status, body) = send_json(&app, "GET", "/gym/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn production_mode_serves_a_prebuilt_bundle() {
    let dist = tempfile::tempdir().unwrap();
    std::fs::write(dist.path().join("index.html"), "<html>bundle</html>").unwrap();
    std::fs::write(dist.path().join("app.js"), "console.log('hi')").unwrap();
    let app = test_app_with(Config {
        mode: Mode::Production,
        client_dist: Some(dist.path().to_path_buf()),
        ..Config::default()
    });

    let (status, bytes) = send(&app, "GET", "/gym/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"console.log('hi')");

    let (status, bytes) = send(&app, "GET", "/gym/calendar/2024-03", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"<html>bundle</html>");
}

#[tokio::test]
async fn entries_are_stored_without_shape_checks() {
    let app = test_app();
    let (status, body) = send_json(
        &app,
        "PUT",
        "/gym/api/logs/2024-03-04",
        Some(json!({ "notes": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["notes"], 5);

    let odd = json!({
        "cardio": { "completed": "yes" },
        "workouts": { "Plank": [{ "set": "1", "reps": null }], "Curls": "none" }
    });
    let (status, body) = send_json(&app, "PUT", "/gym/api/logs/2024-03-05", Some(odd.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["cardio"], odd["cardio"]);
    assert_eq!(body["entry"]["workouts"], odd["workouts"]);

    let (status, body) = send_json(&app, "GET", "/gym/api/logs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"]["2024-03-05"]["cardio"]["completed"], "yes");

    let (status, body) = send_json(&app, "GET", "/gym/api/days/2024-03-05", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"]["cardio"]["completed"], "yes");
    assert_eq!(body["form"]["cardio"]["steps"], "");

    let (status, _) = send(&app, "PUT", "/gym/api/logs/2024-03-06", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn preserved_history_keeps_stale_exercises_last() {
    let app = test_app_with(Config {
        reconcile_policy: ReconcilePolicy::PreserveHistory,
        ..Config::default()
    });
    send_json(
        &app,
        "PUT",
        "/gym/api/logs/2024-03-04",
        Some(json!({ "workouts": { "Aardvark Press": [{ "set": 1, "reps": "8", "weight": "95" }] } })),
    )
    .await;

    let (status, bytes) = send(&app, "GET", "/gym/api/days/2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    let text = &text[text.find("\"form\"").unwrap()..];
    let squats = text.find("Smith Machine Squats").unwrap();
    let plank = text.find("\"Plank\"").unwrap();
    let stale = text.find("Aardvark Press").unwrap();
    assert!(squats < plank && plank < stale);
}

#[tokio::test]
async fn page_is_served_at_the_base_path_with_trailing_slash() {
    let app = test_app();
    let (status, bytes) = send(&app, "GET", "/gym/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().contains("<title>The WFH Dad Recomp</title>"));

    let dist = tempfile::tempdir().unwrap();
    std::fs::write(dist.path().join("index.html"), "<html>bundle</html>").unwrap();
    let app = test_app_with(Config {
        mode: Mode::Production,
        client_dist: Some(dist.path().to_path_buf()),
        ..Config::default()
    });
    let (status, bytes) = send(&app, "GET", "/gym/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"<html>bundle</html>");
}

async fn step(app: &Router, session: &Value, event: Value) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/gym/api/session/events",
        Some(json!({ "session": session, "event": event })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn session_starts_with_the_mount_requests() {
    let app = test_app();
    let (status, body) = send_json(&app, "GET", "/gym/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    let commands = body["commands"].as_array().unwrap();
    let types: Vec<_> = commands.iter().map(|c| c["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["fetchLogs", "fetchWeights", "fetchEntry"]);
    assert_eq!(commands[2]["date"], body["session"]["today"]);
    assert_eq!(body["session"]["entryPhase"]["phase"], "loading");
    assert_eq!(body["view"]["calendar"][0].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn session_ignores_responses_for_a_previous_date() {
    let app = test_app();
    let (_, start) = send_json(&app, "GET", "/gym/api/session", None).await;
    let first_token = start["commands"][2]["token"].clone();

    let body = step(&app, &start["session"], json!({ "type": "selectDate", "date": "2024-03-04" })).await;
    let fetch = &body["commands"][0];
    assert_eq!(fetch["type"], "fetchEntry");
    assert_eq!(fetch["date"], "2024-03-04");
    assert_ne!(fetch["token"], first_token);
    assert_eq!(body["view"]["assignment"], json!({ "type": "lifting", "key": "A" }));

    let stale = json!({
        "type": "entryLoaded",
        "token": first_token,
        "entry": { "date": "2024-03-01", "weight": 999 }
    });
    let body = step(&app, &body["session"], stale).await;
    assert_eq!(body["session"]["entryPhase"]["phase"], "loading");
    assert_eq!(body["session"]["form"]["weight"], "");

    let current = json!({
        "type": "entryLoaded",
        "token": fetch["token"],
        "entry": { "date": "2024-03-04", "weight": 181 }
    });
    let body = step(&app, &body["session"], current).await;
    assert_eq!(body["session"]["entryPhase"]["phase"], "editable");
    assert_eq!(body["session"]["form"]["weight"], 181);
    assert_eq!(body["view"]["workout"]["name"], "Workout A (Monday)");
}

#[tokio::test]
async fn session_failed_save_keeps_edits_and_shows_a_banner() {
    let app = test_app();
    let (_, start) = send_json(&app, "GET", "/gym/api/session", None).await;
    let body = step(
        &app,
        &start["session"],
        json!({ "type": "entryFailed", "token": start["commands"][2]["token"], "error": "offline" }),
    )
    .await;
    assert_eq!(body["session"]["entryPhase"]["phase"], "editable");
    assert!(body["session"]["banner"].is_string());

    let body = step(
        &app,
        &body["session"],
        json!({ "type": "edit", "edit": { "field": "notes", "value": "tired" } }),
    )
    .await;
    let body = step(&app, &body["session"], json!({ "type": "save" })).await;
    let save = body["commands"][0].clone();
    assert_eq!(save["type"], "saveEntry");
    assert_eq!(save["entry"]["notes"], "tired");
    assert_eq!(body["session"]["entryPhase"]["phase"], "saving");

    let body = step(
        &app,
        &body["session"],
        json!({ "type": "saveFailed", "token": save["token"], "error": "500" }),
    )
    .await;
    assert_eq!(body["session"]["entryPhase"]["phase"], "editable");
    assert_eq!(body["session"]["form"]["notes"], "tired");
    assert_eq!(body["session"]["banner"], "Save failed. Check the server console.");
    assert_eq!(body["commands"], json!([]));
}
