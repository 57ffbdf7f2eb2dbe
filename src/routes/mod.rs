pub mod ai;
pub mod analytics;
pub mod applications;
pub mod auth;
pub mod extract;
pub mod health;
pub mod jobs;
pub mod saved_jobs;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::require_bearer_auth,
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full HTTP surface. Public and authenticated routes are separate
/// routers, each behind its own request-rate window.
pub fn app(state: AppState) -> Router {
    let config = crate::config::get_config();

    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/user/:id", get(user::public_profile))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .layer(from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let protected_api = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/user/profile", put(user::update_profile))
        .route("/api/user/resume", post(user::delete_resume))
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/get-jobs-employer", get(jobs::list_employer_jobs))
        .route(
            "/api/jobs/:id",
            put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/:id/toggle-close", put(jobs::toggle_close))
        .route("/api/applications/my", get(applications::my_applications))
        .route(
            "/api/applications/job/:id",
            get(applications::job_applicants),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).post(applications::apply),
        )
        .route(
            "/api/applications/:id/status",
            put(applications::update_status),
        )
        .route("/api/save-jobs/my", get(saved_jobs::my_saved_jobs))
        .route(
            "/api/save-jobs/:id",
            post(saved_jobs::save_job).delete(saved_jobs::unsave_job),
        )
        .route("/api/analytics/overview", get(analytics::overview))
        .route(
            "/api/ai/generate-job-description",
            post(ai::generate_job_description),
        )
        .layer(from_fn(require_bearer_auth))
        .layer(from_fn_with_state(
            RateLimiter::new(config.api_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(protected_api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
