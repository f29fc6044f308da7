use crate::domain::{models::{attendance::Attendance, ticket::{Ticket, TicketDetails}}, ports::TicketRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresTicketRepo {
    pool: PgPool,
}

impl PostgresTicketRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketDetails>, AppError> {
        sqlx::query_as::<_, TicketDetails>("SELECT t.id AS ticket_id, t.code, t.scanned, t.scanned_at, b.id AS booking_id, b.student_id, u.display_name AS student_name, e.id AS event_id, e.title AS event_title, e.venue, e.starts_at, e.organizer_id FROM tickets t JOIN bookings b ON b.id = t.booking_id JOIN events e ON e.id = b.event_id JOIN users u ON u.id = b.student_id WHERE t.code = $1").bind(code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn redeem(&self, ticket_id: &str, scanned_at: DateTime<Utc>, attendance: &Attendance) -> Result<Ticket, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let scanned = sqlx::query_as::<_, Ticket>("UPDATE tickets SET scanned = TRUE, scanned_at = $1 WHERE id = $2 AND scanned = FALSE RETURNING *").bind(scanned_at).bind(ticket_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(ticket) = scanned else {
            return Err(AppError::Conflict("Ticket already scanned".to_string()));
        };

        sqlx::query("INSERT INTO attendance (id, student_id, event_id, created_at) VALUES ($1, $2, $3, $4)").bind(&attendance.id).bind(&attendance.student_id).bind(&attendance.event_id).bind(attendance.created_at).execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(ticket)
    }
}
