use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: i32,
    pub price_cents: i64,
    pub banner_url: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: i32,
    pub price_cents: i64,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organizer_id: params.organizer_id,
            title: params.title,
            description: params.description,
            category: params.category,
            venue: params.venue,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            capacity: params.capacity,
            price_cents: params.price_cents,
            banner_url: None,
            status: EventStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
