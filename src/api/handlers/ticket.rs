use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::ScanTicketRequest;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;

pub async fn scan_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<ScanTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = state.ticketing_service.scan_ticket(&user.0, &payload.code).await?;
    Ok(Json(result))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = state.ticket_repo.find_by_code(&code).await?
        .ok_or(AppError::NotFound("Ticket not found".into()))?;

    let allowed = details.student_id == user.0.id
        || details.organizer_id == user.0.id
        || user.0.role == Role::Admin;
    if !allowed {
        return Err(AppError::Forbidden("This ticket belongs to someone else".into()));
    }

    Ok(Json(details))
}
