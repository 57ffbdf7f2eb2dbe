use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{StatusUpdateResponse, UpdateStatusPayload},
    error::Result,
    routes::extract::{AppJson, AppPath},
    services::authorization::Actor,
    AppState,
};

/// `POST /api/applications/:id`, where the path segment is the job being applied to.
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.apply(&actor, job_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_mine(&actor).await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn job_applicants(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let response = state.application_service.list_for_job(&actor, job_id).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.application_service.get_by_id(&actor, id).await?;
    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .set_status(&actor, id, &payload.status)
        .await?;
    Ok(Json(StatusUpdateResponse {
        message: "Application status updated successfully".to_string(),
        application,
    }))
}
