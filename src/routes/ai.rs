use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::ai_dto::GenerateJobDescriptionPayload, error::Result, routes::extract::AppJson,
    services::authorization::Actor, AppState,
};

#[axum::debug_handler]
pub async fn generate_job_description(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<GenerateJobDescriptionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::debug!(user_id = %actor.id, "job description requested");
    let response = state.ai_service.generate_job_description(&payload).await?;
    Ok(Json(response))
}
