use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, AuthRepository, EventRepository, BookingRepository,
    TicketRepository, AttendanceRepository, LlmService,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::stats::StatsService;
use crate::domain::services::ticketing::TicketingService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub auth_service: Arc<AuthService>,
    pub ticketing_service: Arc<TicketingService>,
    pub stats_service: Arc<StatsService>,
    pub llm_service: Arc<dyn LlmService>,
}
