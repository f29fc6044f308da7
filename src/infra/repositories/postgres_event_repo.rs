use crate::domain::{models::event::{Event, EventStatus}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("INSERT INTO events (id, organizer_id, title, description, category, venue, starts_at, ends_at, capacity, price_cents, banner_url, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *").bind(&event.id).bind(&event.organizer_id).bind(&event.title).bind(&event.description).bind(&event.category).bind(&event.venue).bind(event.starts_at).bind(event.ends_at).bind(event.capacity).bind(event.price_cents).bind(&event.banner_url).bind(event.status).bind(event.created_at).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = $1 ORDER BY starts_at ASC").bind(status).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = $1 ORDER BY created_at DESC").bind(organizer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("UPDATE events SET title=$1, description=$2, category=$3, venue=$4, starts_at=$5, ends_at=$6, capacity=$7, price_cents=$8, banner_url=$9 WHERE id=$10 RETURNING *").bind(&event.title).bind(&event.description).bind(&event.category).bind(&event.venue).bind(event.starts_at).bind(event.ends_at).bind(event.capacity).bind(event.price_cents).bind(&event.banner_url).bind(&event.id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_status(&self, id: &str, status: EventStatus) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("UPDATE events SET status = $1 WHERE id = $2 RETURNING *").bind(status).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?.ok_or(AppError::NotFound("Event not found".into()))
    }
}
