use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::api::dtos::responses::BannerUploadResponse;
use crate::domain::models::event::{Event, EventStatus, NewEventParams};
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_status(EventStatus::Approved).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // Unapproved events are only visible to their organizer and admins.
    if event.status != EventStatus::Approved {
        let allowed = user
            .map(|u| u.id == event.organizer_id || u.role == Role::Admin)
            .unwrap_or(false);
        if !allowed {
            return Err(AppError::NotFound("Event not found".into()));
        }
    }

    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Organizer)?;

    if payload.capacity <= 0 {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    if payload.ends_at <= payload.starts_at {
        return Err(AppError::Validation("Event must end after it starts".into()));
    }

    let event = Event::new(NewEventParams {
        organizer_id: user.0.id.clone(),
        title: payload.title,
        description: payload.description,
        category: payload.category,
        venue: payload.venue,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        capacity: payload.capacity,
        price_cents: payload.price_cents,
    });

    let created = state.event_repo.create(&event).await?;

    info!("Event created: {} by organizer {}", created.id, created.organizer_id);
    Ok(Json(created))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != user.0.id {
        return Err(AppError::Forbidden("You do not own this event".into()));
    }

    if let Some(title) = payload.title { event.title = title; }
    if let Some(description) = payload.description { event.description = description; }
    if let Some(category) = payload.category { event.category = category; }
    if let Some(venue) = payload.venue { event.venue = venue; }
    if let Some(starts_at) = payload.starts_at { event.starts_at = starts_at; }
    if let Some(ends_at) = payload.ends_at { event.ends_at = ends_at; }
    if let Some(capacity) = payload.capacity {
        if capacity <= 0 {
            return Err(AppError::Validation("Capacity must be positive".into()));
        }
        event.capacity = capacity;
    }
    if let Some(price_cents) = payload.price_cents {
        if price_cents < 0 {
            return Err(AppError::Validation("Price must not be negative".into()));
        }
        event.price_cents = price_cents;
    }

    if event.ends_at <= event.starts_at {
        return Err(AppError::Validation("Event must end after it starts".into()));
    }

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn list_my_events(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require_role(Role::Organizer)?;

    let events = state.event_repo.list_by_organizer(&user.0.id).await?;
    Ok(Json(events))
}

// File storage is out of scope; the banner "upload" just mints a CDN-shaped
// URL and stores it on the event.
pub async fn upload_banner(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != user.0.id {
        return Err(AppError::Forbidden("You do not own this event".into()));
    }

    let banner_url = format!(
        "https://cdn.campus-events.local/banners/{}/{}.png",
        event.id,
        Uuid::new_v4()
    );
    event.banner_url = Some(banner_url.clone());
    state.event_repo.update(&event).await?;

    Ok(Json(BannerUploadResponse { banner_url }))
}

pub async fn list_attendees(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != user.0.id {
        return Err(AppError::Forbidden("You do not own this event".into()));
    }

    let attendees = state.attendance_repo.list_by_event(&event.id).await?;
    Ok(Json(attendees))
}
