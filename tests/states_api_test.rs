// State reference data endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use rti_backend_core::models::Role;
use serde_json::json;

fn maharashtra() -> serde_json::Value {
    json!({
        "slug": "Maharashtra",
        "name": "Maharashtra",
        "description": "RTI filing in Maharashtra",
        "departments": [{ "name": "Revenue" }, { "name": "Urban Development" }],
        "faqs": [],
        "process_steps": [{ "step": 1, "title": "Draft the query" }]
    })
}

#[tokio::test]
async fn test_admin_creates_state_and_public_reads_it() {
    let app = TestApp::new();
    let admin = app.admin_token();

    let created = app.post("/api/v1/states", maharashtra(), Some(&admin)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["slug"], "maharashtra");
    assert_eq!(created.data()["is_active"], true);

    let fetched = app.get("/api/v1/states/maharashtra", None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["departments"][1]["name"], "Urban Development");

    let listed = app.get("/api/v1/states", None).await;
    assert_eq!(listed.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = TestApp::new();
    let admin = app.admin_token();

    app.post("/api/v1/states", maharashtra(), Some(&admin)).await;
    let duplicate = app.post("/api/v1/states", maharashtra(), Some(&admin)).await;

    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.message(), "State with this slug already exists");
}

#[tokio::test]
async fn test_state_writes_require_admin() {
    let app = TestApp::new();
    let (_, user) = app.token_for("user@example.com", Role::User);

    let response = app.post("/api/v1/states", maharashtra(), Some(&user)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let anonymous = app.post("/api/v1/states", maharashtra(), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v1/states/atlantis", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "State not found");
}

#[tokio::test]
async fn test_non_array_departments_rejected() {
    let app = TestApp::new();
    let admin = app.admin_token();
    let mut body = maharashtra();
    body["departments"] = json!({ "name": "Revenue" });

    let response = app.post("/api/v1/states", body, Some(&admin)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "departments");
}

#[tokio::test]
async fn test_deactivated_states_leave_the_public_list() {
    let app = TestApp::new();
    let admin = app.admin_token();

    let goa = app
        .post("/api/v1/states", json!({ "slug": "goa", "name": "Goa" }), Some(&admin))
        .await;
    let goa_id = goa.data()["id"].as_i64().unwrap();
    app.post("/api/v1/states", maharashtra(), Some(&admin)).await;

    let names: Vec<String> = app
        .get("/api/v1/states", None)
        .await
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Goa", "Maharashtra"]);

    let updated = app
        .put(
            &format!("/api/v1/states/{}", goa_id),
            json!({ "is_active": false }),
            Some(&admin),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["is_active"], false);

    let listed = app.get("/api/v1/states", None).await;
    assert_eq!(listed.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_delete_state() {
    let app = TestApp::new();
    let admin = app.admin_token();
    let id = app
        .post("/api/v1/states", maharashtra(), Some(&admin))
        .await
        .data()["id"]
        .as_i64()
        .unwrap();

    let deleted = app
        .delete(&format!("/api/v1/states/{}", id), Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app
        .delete(&format!("/api/v1/states/{}", id), Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
