use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::{job_dto::MessageResponse, saved_job_dto::SaveJobResponse},
    error::Result,
    routes::extract::AppPath,
    services::authorization::Actor,
    AppState,
};

#[axum::debug_handler]
pub async fn save_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let saved = state.saved_job_service.save(&actor, job_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(SaveJobResponse {
            message: "Job saved successfully".to_string(),
            saved,
        }),
    ))
}

#[axum::debug_handler]
pub async fn unsave_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.saved_job_service.unsave(&actor, job_id).await?;
    Ok(Json(MessageResponse::new("Job removed from saved list")))
}

#[axum::debug_handler]
pub async fn my_saved_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let saved = state.saved_job_service.list_mine(&actor).await?;
    Ok(Json(saved))
}
