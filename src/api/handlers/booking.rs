use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::responses::BookingCreatedResponse;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, ticket) = state.ticketing_service.create_booking(&user.0, &event_id).await?;
    Ok(Json(BookingCreatedResponse { booking, ticket }))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Student)?;

    let bookings = state.booking_repo.list_by_student(&user.0.id).await?;
    Ok(Json(bookings))
}
