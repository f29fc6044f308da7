use campus_events_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::user::{Role, User},
    domain::ports::{LlmService, UserRepository},
    domain::services::auth_service::AuthService,
    domain::services::stats::StatsService,
    domain::services::ticketing::TicketingService,
    error::AppError,
    infra::repositories::{
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_ticket_repo::SqliteTicketRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
};
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, header},
    Router,
};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "admin-test-password";

pub struct MockLlmService;

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(
        &self,
        _api_key: &str,
        _prompt: &str,
        _system_instruction: &str
    ) -> Result<String, AppError> {
        Ok("Mock AI Response: here is what you can do next.".to_string())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_enforce_capacity(true).await
    }

    pub async fn with_enforce_capacity(enforce_capacity: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-jwt-secret".to_string(),
            auth_issuer: "test-issuer".to_string(),
            gemini_api_key: "".to_string(),
            enforce_capacity,
            chat_queue_depth: 2,
            ai_timeout_secs: 1,
            admin_username: "admin".to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
        let attendance_repo = Arc::new(SqliteAttendanceRepo::new(pool.clone()));

        let salt = SaltString::generate(&mut OsRng);
        let admin_hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();
        let admin = User::new("admin".to_string(), "Platform Admin".to_string(), admin_hash, Role::Admin);
        user_repo.create(&admin).await.expect("Failed to seed test admin");

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

        let state = Arc::new(AppState {
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
            llm_service: Arc::new(MockLlmService),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) -> String {
        let payload = json!({
            "username": username,
            "password": password,
            "display_name": username,
            "role": role
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Register failed in test helper: status {}", response.status());
        }

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        body_json["id"].as_str().expect("No id in register response").to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = json!({
            "username": username,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login("admin", ADMIN_PASSWORD).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
