// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::{Value, json};

use super::{TEST_USERNAME, create_test_app, login_token, read_json, send};

#[tokio::test]
async fn test_login_returns_session_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());

    let response = send(
        &app,
        "POST",
        "/login",
        None,
        Some(&json!({ "username": "admin", "password": "correct horse" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body["username"], TEST_USERNAME);
    assert_eq!(body["session_token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());

    let response = send(
        &app,
        "POST",
        "/login",
        None,
        Some(&json!({ "username": "admin", "password": "wrong" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_protected_route_requires_authorization_header() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());

    let response = send(&app, "GET", "/students", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_unknown_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());

    let response = send(&app, "GET", "/classes", Some("not-a-session"), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let before = send(&app, "GET", "/classes", Some(&token), None).await;
    assert_eq!(before.status(), StatusCode::OK);

    let logout = send(&app, "POST", "/logout", Some(&token), None).await;
    assert_eq!(logout.status(), StatusCode::OK);

    let after = send(&app, "GET", "/classes", Some(&token), None).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}
