use std::sync::Arc;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::{
    attendance::Attendance,
    booking::Booking,
    event::EventStatus,
    ticket::Ticket,
    user::{Role, User},
};
use crate::domain::ports::{BookingRepository, EventRepository, TicketRepository};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub success: bool,
    pub ticket: Ticket,
    pub student_id: String,
    pub student_name: String,
    pub event_id: String,
    pub event_title: String,
}

/// Booking issuance and ticket redemption. A booking and its ticket are
/// created as one unit of work; a ticket transitions unscanned -> scanned
/// exactly once.
pub struct TicketingService {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    ticket_repo: Arc<dyn TicketRepository>,
    enforce_capacity: bool,
}

impl TicketingService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        ticket_repo: Arc<dyn TicketRepository>,
        enforce_capacity: bool,
    ) -> Self {
        Self { event_repo, booking_repo, ticket_repo, enforce_capacity }
    }

    pub async fn create_booking(&self, student: &User, event_id: &str) -> Result<(Booking, Ticket), AppError> {
        student.require_role(Role::Student)?;

        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.status != EventStatus::Approved {
            return Err(AppError::Forbidden("Event is not open for booking".into()));
        }

        if self.enforce_capacity {
            let booked = self.booking_repo.count_by_event(&event.id).await?;
            if booked >= event.capacity as i64 {
                warn!("Booking rejected: event {} is at capacity ({})", event.id, event.capacity);
                return Err(AppError::Conflict("Event is at capacity".into()));
            }
        }

        let booking = Booking::new(student.id.clone(), &event);
        let ticket = Ticket::new(booking.id.clone());

        let (booking, ticket) = self.booking_repo.create_with_ticket(&booking, &ticket).await?;

        info!("Booking confirmed: {} for event {}", booking.id, event.id);
        Ok((booking, ticket))
    }

    pub async fn scan_ticket(&self, organizer: &User, code: &str) -> Result<ScanResult, AppError> {
        organizer.require_role(Role::Organizer)?;

        let details = self.ticket_repo.find_by_code(code).await?
            .ok_or(AppError::NotFound("Ticket not found".into()))?;

        if details.organizer_id != organizer.id {
            return Err(AppError::Forbidden("Ticket belongs to another organizer's event".into()));
        }

        let attendance = Attendance::new(details.student_id.clone(), details.event_id.clone());
        let ticket = self.ticket_repo.redeem(&details.ticket_id, Utc::now(), &attendance).await?;

        info!("Ticket scanned: {} for event {}", ticket.id, details.event_id);

        Ok(ScanResult {
            success: true,
            ticket,
            student_id: details.student_id,
            student_name: details.student_name,
            event_id: details.event_id,
            event_title: details.event_title,
        })
    }
}
