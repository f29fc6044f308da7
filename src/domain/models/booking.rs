use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::event::Event;

// Payment is out of scope; every booking is recorded as already paid.
pub const PAYMENT_STATUS_PAID: &str = "PAID";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub student_id: String,
    pub event_id: String,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(student_id: String, event: &Event) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            event_id: event.id.clone(),
            amount_cents: event.price_cents,
            status: PAYMENT_STATUS_PAID.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Flat row for a student's booking list (booking joined with event and ticket).
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct BookingSummary {
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub ticket_code: String,
    pub scanned: bool,
}
