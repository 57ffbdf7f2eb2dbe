use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, UserProfile},
    error::Result,
    routes::extract::AppJson,
    services::authorization::Actor,
    AppState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (user, token) = state.user_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(user),
            token,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (user, token) = state.user_service.login(payload).await?;
    Ok(Json(AuthResponse {
        user: UserProfile::from(user),
        token,
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.me(&actor).await?;
    Ok(Json(UserProfile::from(user)))
}
