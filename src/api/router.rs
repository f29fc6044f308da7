use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, auth, booking, chat, event, health, stats, ticket};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Event catalog
        .route("/api/v1/events", get(event::list_events).post(event::create_event))
        .route("/api/v1/events/{event_id}", get(event::get_event).put(event::update_event))
        .route("/api/v1/events/{event_id}/banner", post(event::upload_banner))
        .route("/api/v1/events/{event_id}/attendees", get(event::list_attendees))

        // Booking flow
        .route("/api/v1/events/{event_id}/book", post(booking::create_booking))
        .route("/api/v1/bookings", get(booking::list_my_bookings))

        // Tickets
        .route("/api/v1/tickets/scan", post(ticket::scan_ticket))
        .route("/api/v1/tickets/{code}", get(ticket::get_ticket))

        // Organizer
        .route("/api/v1/organizer/events", get(event::list_my_events))
        .route("/api/v1/organizer/stats", get(stats::organizer_stats))

        // Admin approval queue
        .route("/api/v1/admin/events/pending", get(admin::list_pending_events))
        .route("/api/v1/admin/events/{event_id}/approve", post(admin::approve_event))
        .route("/api/v1/admin/events/{event_id}/reject", post(admin::reject_event))

        // Chat assistant
        .route("/api/v1/chat/ws", get(chat::chat_ws))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
