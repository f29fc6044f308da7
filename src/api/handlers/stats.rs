use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;

pub async fn organizer_stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Organizer)?;

    let stats = state.stats_service.organizer_stats(&user.0.id).await?;
    Ok(Json(stats))
}
