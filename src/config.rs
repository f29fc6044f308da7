use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub gemini_api_key: String,
    pub enforce_capacity: bool,
    pub chat_queue_depth: usize,
    pub ai_timeout_secs: u64,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.campus-events.local".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            enforce_capacity: env::var("ENFORCE_CAPACITY").map(|v| v != "false" && v != "0").unwrap_or(true),
            chat_queue_depth: env::var("CHAT_QUEUE_DEPTH").unwrap_or_else(|_| "8".to_string()).parse().expect("CHAT_QUEUE_DEPTH must be a number"),
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("AI_TIMEOUT_SECS must be a number"),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),
        }
    }
}
