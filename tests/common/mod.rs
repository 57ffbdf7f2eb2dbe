#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use job_portal_backend::{database::MemoryStore, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub fn init_test_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("STORAGE", "memory");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("PUBLIC_RPS", "10000");
    env::set_var("API_RPS", "10000");
    env::set_var("APP_ENV", "test");
    let _ = job_portal_backend::config::init_config();
}

pub fn test_state() -> AppState {
    init_test_config();
    AppState::with_store(Arc::new(MemoryStore::new()))
}

pub fn test_app() -> Router {
    routes::app(test_state())
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, value)
}

/// Registers an identity and returns its bearer token and id.
pub async fn register(app: &Router, name: &str, email: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["id"].as_str().unwrap().to_string(),
    )
}

pub async fn post_job(app: &Router, token: &str, title: &str, min: u64, max: u64) -> JsonValue {
    let (status, body) = send(
        app,
        "POST",
        "/api/jobs",
        Some(token),
        Some(json!({
            "title": title,
            "description": "Build and run services",
            "requirements": "Three years of experience",
            "location": "Berlin",
            "category": "Engineering",
            "type": "Full-Time",
            "salary_min": min,
            "salary_max": max
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "post job failed: {}", body);
    body
}
