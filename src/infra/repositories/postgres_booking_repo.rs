use crate::domain::{models::{booking::{Booking, BookingSummary}, ticket::Ticket}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_with_ticket(&self, booking: &Booking, ticket: &Ticket) -> Result<(Booking, Ticket), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created_booking = sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, student_id, event_id, amount_cents, status, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *").bind(&booking.id).bind(&booking.student_id).bind(&booking.event_id).bind(booking.amount_cents).bind(&booking.status).bind(booking.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        let created_ticket = sqlx::query_as::<_, Ticket>("INSERT INTO tickets (id, booking_id, code, scanned, scanned_at, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *").bind(&ticket.id).bind(&ticket.booking_id).bind(&ticket.code).bind(ticket.scanned).bind(ticket.scanned_at).bind(ticket.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok((created_booking, created_ticket))
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<BookingSummary>, AppError> {
        sqlx::query_as::<_, BookingSummary>("SELECT b.id, b.event_id, e.title AS event_title, e.venue, e.starts_at, b.amount_cents, b.status, b.created_at, t.code AS ticket_code, t.scanned FROM bookings b JOIN events e ON e.id = b.event_id JOIN tickets t ON t.booking_id = b.id WHERE b.student_id = $1 ORDER BY b.created_at DESC").bind(student_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE event_id = $1").bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
    async fn sum_amount_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COALESCE(SUM(amount_cents), 0)::BIGINT as total FROM bookings WHERE event_id = $1").bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("total"))
    }
}
