use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{
        CreateJobPayload, JobActionResponse, JobListQuery, MessageResponse, UpdateJobPayload,
        ViewerQuery,
    },
    error::Result,
    routes::extract::{AppJson, AppPath, AppQuery},
    services::authorization::Actor,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created successfully", body = Json<Job>),
        (status = 400, description = "Invalid payload or salary range"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("keyword" = Option<String>, Query, description = "Case-insensitive title search"),
        ("location" = Option<String>, Query, description = "Case-insensitive location search"),
        ("category" = Option<String>, Query, description = "Exact category"),
        ("type" = Option<String>, Query, description = "Exact job type"),
        ("min_salary" = Option<String>, Query, description = "Lower bound on salary_max"),
        ("max_salary" = Option<String>, Query, description = "Upper bound on salary_max"),
        ("user_id" = Option<Uuid>, Query, description = "Viewer for saved and applied flags")
    ),
    responses(
        (status = 200, description = "Open jobs, newest first", body = Json<Vec<JobView>>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(&query.filter(), query.user_id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/get-jobs-employer",
    responses(
        (status = 200, description = "Employer's own jobs with application counts", body = Json<Vec<EmployerJob>>),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn list_employer_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_for_employer(&actor).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("user_id" = Option<Uuid>, Query, description = "Viewer for saved and applied flags")
    ),
    responses(
        (status = 200, description = "Job detail", body = Json<JobView>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(viewer): AppQuery<ViewerQuery>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id, viewer.user_id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated successfully", body = Json<Job>),
        (status = 400, description = "Invalid payload or salary range"),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&actor, id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted successfully", body = Json<MessageResponse>),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&actor, id).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}/toggle-close",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Closed flag flipped", body = Json<JobActionResponse>),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn toggle_close(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.toggle_close(&actor, id).await?;
    let message = if job.is_closed {
        "Job has been closed"
    } else {
        "Job has been reopened"
    };
    Ok(Json(JobActionResponse {
        message: message.to_string(),
        job,
    }))
}
