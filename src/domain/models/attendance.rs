use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Attendance {
    pub id: String,
    pub student_id: String,
    pub event_id: String,
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    pub fn new(student_id: String, event_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            event_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct AttendanceEntry {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub created_at: DateTime<Utc>,
}
