mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_job, register, send, test_app};

#[tokio::test]
async fn overview_rolls_up_owned_jobs_only() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "e@example.com", "employer").await;
    let (rival, _) = register(&app, "Rob", "r@example.com", "employer").await;
    let (seeker, _) = register(&app, "Ann", "a@example.com", "jobseeker").await;

    let open = post_job(&app, &employer, "Open Role", 1000, 2000).await;
    let closed = post_job(&app, &employer, "Closed Role", 1000, 2000).await;
    post_job(&app, &rival, "Rival Role", 1000, 2000).await;

    let (_, application) = send(
        &app,
        "POST",
        &format!("/api/applications/{}", open["id"].as_str().unwrap()),
        Some(&seeker),
        None,
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/applications/{}/status", application["id"].as_str().unwrap()),
        Some(&employer),
        Some(json!({"status": "Accepted"})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/jobs/{}/toggle-close", closed["id"].as_str().unwrap()),
        Some(&employer),
        None,
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/analytics/overview", Some(&employer), None).await;
    assert_eq!(status, StatusCode::OK);
    let counts = &body["counts"];
    assert_eq!(counts["total_active_jobs"], 1);
    assert_eq!(counts["total_closed_jobs"], 1);
    assert_eq!(counts["total_applications"], 1);
    assert_eq!(counts["total_hired"], 1);
    assert_eq!(counts["trends"]["active_jobs"], 100);

    assert_eq!(body["data"]["recent_jobs"].as_array().unwrap().len(), 2);
    let recent = &body["data"]["recent_applications"][0];
    assert_eq!(recent["job_title"], "Open Role");
    assert_eq!(recent["applicant"]["name"], "Ann");

    let (status, _) = send(&app, "GET", "/api/analytics/overview", Some(&seeker), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
