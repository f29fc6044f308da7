use crate::domain::models::{
    user::User, event::{Event, EventStatus}, booking::{Booking, BookingSummary},
    ticket::{Ticket, TicketDetails}, attendance::{Attendance, AttendanceEntry},
    auth::RefreshTokenRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn set_status(&self, id: &str, status: EventStatus) -> Result<Event, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its ticket as one unit of work.
    async fn create_with_ticket(&self, booking: &Booking, ticket: &Ticket) -> Result<(Booking, Ticket), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<BookingSummary>, AppError>;
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
    async fn sum_amount_by_event(&self, event_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketDetails>, AppError>;
    /// Flips the ticket to scanned and appends the attendance record in the
    /// same transaction. Fails with Conflict if the ticket was already scanned.
    async fn redeem(&self, ticket_id: &str, scanned_at: DateTime<Utc>, attendance: &Attendance) -> Result<Ticket, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceEntry>, AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError>;
}
