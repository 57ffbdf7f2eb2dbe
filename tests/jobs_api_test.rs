mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_job, register, send, test_app};

#[tokio::test]
async fn salary_bounds_are_enforced_on_create() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve@example.com", "employer").await;

    let job = post_job(&app, &employer, "Backend Engineer", 80000, 120000).await;
    assert_eq!(job["salary_min"].as_f64(), Some(80000.0));
    assert_eq!(job["salary_max"].as_f64(), Some(120000.0));
    assert_eq!(job["is_closed"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&employer),
        Some(json!({
            "title": "Inverted",
            "description": "d",
            "requirements": "r",
            "salary_min": 100000,
            "salary_max": 90000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, "GET", "/api/jobs", None, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn job_seekers_cannot_post_jobs() {
    let app = test_app();
    let (seeker, _) = register(&app, "Sam", "sam@example.com", "jobseeker").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&seeker),
        Some(json!({
            "title": "Nope",
            "description": "d",
            "requirements": "r",
            "salary_min": 1,
            "salary_max": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_filters_and_hides_closed_jobs() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve2@example.com", "employer").await;

    post_job(&app, &employer, "Rust Developer", 50000, 90000).await;
    post_job(&app, &employer, "Go Developer", 40000, 60000).await;
    let closed = post_job(&app, &employer, "Rust Lead", 90000, 150000).await;
    let closed_id = closed["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/jobs/{}/toggle-close", closed_id),
        Some(&employer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job has been closed");

    let (_, rust_jobs) = send(&app, "GET", "/api/jobs?keyword=rust", None, None).await;
    let rust_jobs = rust_jobs.as_array().unwrap();
    assert_eq!(rust_jobs.len(), 1);
    assert_eq!(rust_jobs[0]["title"], "Rust Developer");
    assert_eq!(rust_jobs[0]["company"]["name"], "Eve");

    let (_, paid) = send(&app, "GET", "/api/jobs?min_salary=70000", None, None).await;
    assert_eq!(paid.as_array().unwrap().len(), 1);

    let (_, capped) = send(&app, "GET", "/api/jobs?max_salary=60000", None, None).await;
    let capped = capped.as_array().unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0]["title"], "Go Developer");

    let (_, by_type) = send(&app, "GET", "/api/jobs?type=Part-Time", None, None).await;
    assert!(by_type.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/jobs/{}/toggle-close", closed_id),
        Some(&employer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job has been reopened");
}

#[tokio::test]
async fn only_the_owner_updates_and_deletes() {
    let app = test_app();
    let (owner, _) = register(&app, "Owner", "owner@example.com", "employer").await;
    let (other, _) = register(&app, "Other", "other@example.com", "employer").await;
    let job = post_job(&app, &owner, "Designer", 30000, 50000).await;
    let path = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &path, Some(&other), Some(json!({"title": "Hijacked"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &path, Some(&owner), Some(json!({"salary_max": 20000}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        "PUT",
        &path,
        Some(&owner),
        Some(json!({"title": "Senior Designer", "salary_max": 70000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Senior Designer");
    assert_eq!(updated["salary_min"].as_f64(), Some(30000.0));

    let (status, _) = send(&app, "DELETE", &path, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &path, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job deleted successfully");

    let (status, body) = send(&app, "GET", &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");
}

#[tokio::test]
async fn employer_listing_counts_applications() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve3@example.com", "employer").await;
    let (seeker, _) = register(&app, "Ann", "ann3@example.com", "jobseeker").await;
    let job = post_job(&app, &employer, "Analyst", 10000, 20000).await;
    post_job(&app, &employer, "Intern", 1000, 2000).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/applications/{}", job["id"].as_str().unwrap()),
        Some(&seeker),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, jobs) = send(&app, "GET", "/api/jobs/get-jobs-employer", Some(&employer), None).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    let analyst = jobs.iter().find(|j| j["title"] == "Analyst").unwrap();
    assert_eq!(analyst["application_count"], 1);

    let (status, _) = send(&app, "GET", "/api/jobs/get-jobs-employer", Some(&seeker), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn viewer_flags_follow_saves_and_applications() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve4@example.com", "employer").await;
    let (seeker, seeker_id) = register(&app, "Ann", "ann4@example.com", "jobseeker").await;
    let job = post_job(&app, &employer, "Writer", 10000, 20000).await;
    let job_id = job["id"].as_str().unwrap();

    send(&app, "POST", &format!("/api/save-jobs/{}", job_id), Some(&seeker), None).await;
    send(&app, "POST", &format!("/api/applications/{}", job_id), Some(&seeker), None).await;

    let (_, listed) = send(&app, "GET", &format!("/api/jobs?user_id={}", seeker_id), None, None).await;
    assert_eq!(listed[0]["is_saved"], true);
    assert_eq!(listed[0]["application_status"], "Applied");

    let (_, anonymous) = send(&app, "GET", &format!("/api/jobs/{}", job_id), None, None).await;
    assert_eq!(anonymous["is_saved"], false);
    assert!(anonymous["application_status"].is_null());

    let (_, viewed) = send(
        &app,
        "GET",
        &format!("/api/jobs/{}?user_id={}", job_id, seeker_id),
        None,
        None,
    )
    .await;
    assert_eq!(viewed["is_saved"], true);
    assert_eq!(viewed["application_status"], "Applied");
}

#[tokio::test]
async fn missing_salaries_are_a_json_bad_request() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve5@example.com", "employer").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&employer),
        Some(json!({
            "title": "No Pay",
            "description": "d",
            "requirements": "r"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("salary_min"));
}

#[tokio::test]
async fn editing_a_job_does_not_reopen_it() {
    let app = test_app();
    let (employer, _) = register(&app, "Eve", "eve6@example.com", "employer").await;
    let job = post_job(&app, &employer, "Ops", 1000, 2000).await;
    let path = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &format!("{}/toggle-close", path), Some(&employer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, updated) = send(&app, "PUT", &path, Some(&employer), Some(json!({"title": "Ops Lead"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Ops Lead");
    assert_eq!(updated["is_closed"], true);
}
