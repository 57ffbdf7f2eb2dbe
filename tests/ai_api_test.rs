mod common;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use job_portal_backend::{routes, services::ai_service::AIService};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;

use common::{register, send, test_state};

const GENERATED: &str = "JOB DESCRIPTION:\nShip reliable services.\n\nREQUIREMENTS:\n- Five years of Rust";

/// Serves a canned `/chat/completions` reply and returns the base URL.
async fn spawn_upstream(status: StatusCode, body: JsonValue) -> String {
    let upstream = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(request): Json<JsonValue>| {
            let body = body.clone();
            async move {
                assert_eq!(request["messages"][0]["role"], "system");
                (status, Json(body)).into_response()
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

async fn app_against(status: StatusCode, body: JsonValue) -> Router {
    let base_url = spawn_upstream(status, body).await;
    let mut state = test_state();
    state.ai_service = AIService::new(
        reqwest::Client::new(),
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
        2000,
        base_url,
    );
    routes::app(state)
}

async fn generate(app: &Router, token: &str) -> (StatusCode, JsonValue) {
    send(
        app,
        "POST",
        "/api/ai/generate-job-description",
        Some(token),
        Some(json!({"job_title": "Rust Engineer", "location": "Remote"})),
    )
    .await
}

#[tokio::test]
async fn generation_splits_sections_and_reports_usage() {
    let app = app_against(
        StatusCode::OK,
        json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"role": "assistant", "content": GENERATED}}],
            "usage": {"total_tokens": 321}
        }),
    )
    .await;
    let (token, _) = register(&app, "Eve", "eve@example.com", "employer").await;

    let (status, body) = generate(&app, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["description"], "Ship reliable services.");
    assert_eq!(body["data"]["requirements"], "- Five years of Rust");
    assert_eq!(body["data"]["full_text"], GENERATED);
    assert_eq!(body["metadata"]["tokens_used"], 321);
    assert_eq!(body["metadata"]["model"], "gpt-4o-mini-2024-07-18");
    assert_eq!(body["metadata"]["job_title"], "Rust Engineer");
}

#[tokio::test]
async fn provider_error_codes_map_to_statuses() {
    let cases = [
        (StatusCode::TOO_MANY_REQUESTS, "insufficient_quota", StatusCode::PAYMENT_REQUIRED),
        (StatusCode::UNAUTHORIZED, "invalid_api_key", StatusCode::UNAUTHORIZED),
        (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded", StatusCode::TOO_MANY_REQUESTS),
        (StatusCode::INTERNAL_SERVER_ERROR, "server_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (upstream_status, code, expected) in cases {
        let app = app_against(
            upstream_status,
            json!({"error": {"code": code, "message": "upstream said no"}}),
        )
        .await;
        let email = format!("{}@example.com", code);
        let (token, _) = register(&app, "Eve", &email, "employer").await;

        let (status, body) = generate(&app, &token).await;
        assert_eq!(status, expected, "code {}", code);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn generic_failure_hides_detail_outside_development() {
    let app = app_against(
        StatusCode::BAD_GATEWAY,
        json!({"error": {"message": "secret upstream detail"}}),
    )
    .await;
    let (token, _) = register(&app, "Eve", "eve2@example.com", "employer").await;

    let (status, body) = generate(&app, &token).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to generate job description. Please try again."
    );
}

#[tokio::test]
async fn blank_title_and_missing_token_are_rejected() {
    let app = app_against(StatusCode::OK, json!({})).await;
    let (token, _) = register(&app, "Eve", "eve3@example.com", "employer").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/ai/generate-job-description",
        Some(&token),
        Some(json!({"job_title": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Job title is required");

    let (status, _) = send(
        &app,
        "POST",
        "/api/ai/generate-job-description",
        None,
        Some(json!({"job_title": "Rust Engineer"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
