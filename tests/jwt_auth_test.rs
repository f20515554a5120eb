// Access token handling at the HTTP boundary

mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_JWT_SECRET};
use jsonwebtoken::{encode, EncodingKey, Header};
use rti_backend_core::models::{AccessTokenClaims, Role};
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn sign(claims: &AccessTokenClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn claims(user_id: i64, role: Role, iat: u64, exp: u64) -> AccessTokenClaims {
    AccessTokenClaims {
        sub: user_id.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        email: "clerk@rti.test".to_string(),
        role,
        aud: "rti-portal".to_string(),
        iss: "rti-portal".to_string(),
        iat,
        exp,
    }
}

#[tokio::test]
async fn test_hand_signed_token_is_accepted() {
    let app = TestApp::new();
    let admin = app.store.insert_user("clerk@rti.test", Role::Admin);
    let token = sign(&claims(admin.id, Role::Admin, now(), now() + 600), TEST_JWT_SECRET);

    let response = app.get("/api/v1/consultations", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let admin = app.store.insert_user("clerk@rti.test", Role::Admin);
    let issued = now() - 7200;
    let token = sign(&claims(admin.id, Role::Admin, issued, issued + 3600), TEST_JWT_SECRET);

    let response = app.get("/api/v1/consultations", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid or expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let admin = app.store.insert_user("clerk@rti.test", Role::Admin);
    let token = sign(
        &claims(admin.id, Role::Admin, now(), now() + 600),
        "some-other-secret-that-is-also-long-enough",
    );

    let response = app.get("/api/v1/consultations", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_numeric_subject_is_rejected() {
    let app = TestApp::new();
    let mut forged = claims(1, Role::Admin, now(), now() + 600);
    forged.sub = "admin".to_string();
    let token = sign(&forged, TEST_JWT_SECRET);

    let response = app.get("/api/v1/consultations", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_prefix_is_required() {
    let app = TestApp::new();
    let (_, token) = app.token_for("clerk@rti.test", Role::Admin);

    let request = axum::http::Request::builder()
        .uri("/api/v1/consultations")
        .header("authorization", format!("Token {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
