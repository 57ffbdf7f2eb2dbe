use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, services::authorization::Actor, AppState};

#[axum::debug_handler]
pub async fn overview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let overview = state.analytics_service.overview(&actor).await?;
    Ok(Json(overview))
}
