// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod auth_route_tests;
mod config_tests;
mod student_route_tests;

use std::path::Path;
use std::sync::Arc;

use achievement_log_api::ensure_initial_admin;
use achievement_log_persistence::Persistence;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "correct horse";

/// Helper to create test app state with in-memory persistence and one admin.
pub fn create_test_app_state(backup_dir: &Path) -> AppState {
    let mut persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_cost(4);
    ensure_initial_admin(&mut persistence, TEST_USERNAME, TEST_PASSWORD)
        .expect("Failed to create test admin");

    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        backup_dir: Arc::new(backup_dir.to_path_buf()),
        backup_keep: 10,
        session_days: 30,
    }
}

pub fn create_test_app(backup_dir: &Path) -> Router {
    build_router(create_test_app_state(backup_dir))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

pub async fn read_text(response: Response<Body>) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}

/// Logs in as the test admin and returns the session token.
pub async fn login_token(app: &Router) -> String {
    let response = send(
        app,
        "POST",
        "/login",
        None,
        Some(&json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD })),
    )
    .await;
    let body: Value = read_json(response).await;
    body["session_token"].as_str().unwrap().to_string()
}

pub fn student_body(full_name: &str, class_name: &str, achievements: &[Value]) -> Value {
    json!({
        "full_name": full_name,
        "class_name": class_name,
        "class_teacher": "Petrova O.S.",
        "achievements": achievements,
    })
}

pub fn achievement_body(name: &str, participation_date: &str) -> Value {
    json!({
        "name": name,
        "level": "District",
        "result": "PrizeWinner",
        "academic_year": "25/26",
        "participation_date": participation_date,
    })
}
