use std::sync::Arc;
use serde::Serialize;

use crate::domain::ports::{AttendanceRepository, BookingRepository, EventRepository};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct OrganizerStats {
    pub total_events: i64,
    pub total_registrations: i64,
    pub total_revenue_cents: i64,
    pub attendance_rate: f64,
}

pub struct StatsService {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    attendance_repo: Arc<dyn AttendanceRepository>,
}

impl StatsService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        attendance_repo: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self { event_repo, booking_repo, attendance_repo }
    }

    pub async fn organizer_stats(&self, organizer_id: &str) -> Result<OrganizerStats, AppError> {
        let events = self.event_repo.list_by_organizer(organizer_id).await?;

        let mut registrations: i64 = 0;
        let mut attended: i64 = 0;
        let mut revenue_cents: i64 = 0;

        for event in &events {
            registrations += self.booking_repo.count_by_event(&event.id).await?;
            attended += self.attendance_repo.count_by_event(&event.id).await?;
            revenue_cents += self.booking_repo.sum_amount_by_event(&event.id).await?;
        }

        Ok(OrganizerStats {
            total_events: events.len() as i64,
            total_registrations: registrations,
            total_revenue_cents: revenue_cents,
            attendance_rate: attendance_rate(attended, registrations),
        })
    }
}

pub fn attendance_rate(attended: i64, registrations: i64) -> f64 {
    if registrations <= 0 {
        return 0.0;
    }
    attended as f64 / registrations as f64 * 100.0
}
