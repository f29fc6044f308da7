use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

const TICKET_CODE_LEN: usize = 40;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Ticket {
    pub id: String,
    pub booking_id: String,
    pub code: String,
    pub scanned: bool,
    pub scanned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(booking_id: String) -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TICKET_CODE_LEN)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            code,
            scanned: false,
            scanned_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Ticket joined with its booking, event and student, as consumed by the
/// scanner and the external ticket renderer.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct TicketDetails {
    pub ticket_id: String,
    pub code: String,
    pub scanned: bool,
    pub scanned_at: Option<DateTime<Utc>>,
    pub booking_id: String,
    pub student_id: String,
    pub student_name: String,
    pub event_id: String,
    pub event_title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub organizer_id: String,
}
