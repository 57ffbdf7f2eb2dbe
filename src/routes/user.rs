use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::auth_dto::{PublicProfile, UpdateProfilePayload, UserProfile},
    dto::job_dto::MessageResponse,
    error::Result,
    routes::extract::{AppJson, AppPath},
    services::authorization::Actor,
    AppState,
};

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .update_profile(&actor, payload.into())
        .await?;
    Ok(Json(UserProfile::from(user)))
}

#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    state.user_service.delete_resume(&actor).await?;
    Ok(Json(MessageResponse::new("Resume deleted successfully")))
}

#[axum::debug_handler]
pub async fn public_profile(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.public_profile(id).await?;
    Ok(Json(PublicProfile::from(user)))
}
