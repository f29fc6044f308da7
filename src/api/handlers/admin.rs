use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::EventStatus;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_pending_events(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Admin)?;

    let events = state.event_repo.list_by_status(EventStatus::Pending).await?;
    Ok(Json(events))
}

pub async fn approve_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Admin)?;

    let event = state.event_repo.set_status(&event_id, EventStatus::Approved).await?;
    info!("Event approved: {}", event.id);
    Ok(Json(event))
}

pub async fn reject_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Admin)?;

    let event = state.event_repo.set_status(&event_id, EventStatus::Rejected).await?;
    info!("Event rejected: {}", event.id);
    Ok(Json(event))
}
