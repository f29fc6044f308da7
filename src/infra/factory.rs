use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::user::{Role, User};
use crate::domain::ports::{
    AttendanceRepository, AuthRepository, BookingRepository, EventRepository,
    TicketRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::stats::StatsService;
use crate::domain::services::ticketing::TicketingService;
use crate::infra::ai::gemini_service::GeminiService;
use crate::infra::repositories::{
    postgres_attendance_repo::PostgresAttendanceRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_ticket_repo::PostgresTicketRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_attendance_repo::SqliteAttendanceRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_ticket_repo::SqliteTicketRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let llm_service = Arc::new(GeminiService::new());

    let (user_repo, auth_repo, event_repo, booking_repo, ticket_repo, attendance_repo): (
        Arc<dyn UserRepository>,
        Arc<dyn AuthRepository>,
        Arc<dyn EventRepository>,
        Arc<dyn BookingRepository>,
        Arc<dyn TicketRepository>,
        Arc<dyn AttendanceRepository>,
    ) = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        (
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresAuthRepo::new(pool.clone())),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool.clone())),
            Arc::new(PostgresTicketRepo::new(pool.clone())),
            Arc::new(PostgresAttendanceRepo::new(pool.clone())),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        (
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteAuthRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
            Arc::new(SqliteTicketRepo::new(pool.clone())),
            Arc::new(SqliteAttendanceRepo::new(pool.clone())),
        )
    };

    seed_admin(&user_repo, config).await;

    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
    let ticketing_service = Arc::new(TicketingService::new(
        event_repo.clone(),
        booking_repo.clone(),
        ticket_repo.clone(),
        config.enforce_capacity,
    ));
    let stats_service = Arc::new(StatsService::new(
        event_repo.clone(),
        booking_repo.clone(),
        attendance_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        user_repo,
        auth_repo,
        event_repo,
        booking_repo,
        ticket_repo,
        attendance_repo,
        auth_service,
        ticketing_service,
        stats_service,
        llm_service,
    }
}

async fn seed_admin(user_repo: &Arc<dyn UserRepository>, config: &Config) {
    let existing = user_repo.find_by_username(&config.admin_username)
        .await
        .expect("Failed to look up admin user");

    if existing.is_none() {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(config.admin_password.as_bytes(), &salt)
            .expect("Failed to hash admin password")
            .to_string();

        let admin = User::new(
            config.admin_username.clone(),
            "Platform Admin".to_string(),
            password_hash,
            Role::Admin,
        );
        user_repo.create(&admin).await.expect("Failed to seed admin user");
        info!("Seeded admin user '{}'", config.admin_username);
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
