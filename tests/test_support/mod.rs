#![allow(dead_code)]

use std::collections::HashMap;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use branch_portal::auth::{SessionManager, sha256_hex};
use branch_portal::config::Config;
use branch_portal::db;
use branch_portal::routes::router;
use branch_portal::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "officers@branch.example.edu";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub fn test_config() -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", "integration-secret".to_string()),
        ("ADMIN_EMAIL", ADMIN_EMAIL.to_string()),
        ("ADMIN_PASSWORD_SHA256", sha256_hex(ADMIN_PASSWORD)),
        ("BIND_ADDR", "127.0.0.1:0".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

pub async fn test_state() -> AppState {
    let pool = db::in_memory().await.expect("Failed to create test db");
    AppState::new(pool, SessionManager::new(&test_config()))
}

pub async fn test_app() -> Router {
    router(test_state().await)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

pub fn course_json(slug: &str, title: &str, status: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "year": "2025",
        "semester": "Fall",
        "thumbnail": format!("/{slug}.jpg"),
        "slug": slug,
        "status": status,
        "duration": "8 weeks",
        "enrolled": 12
    })
}
