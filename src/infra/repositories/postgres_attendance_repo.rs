use crate::domain::{models::attendance::AttendanceEntry, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM attendance WHERE event_id = $1").bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceEntry>, AppError> {
        sqlx::query_as::<_, AttendanceEntry>("SELECT a.id, a.student_id, u.display_name AS student_name, a.created_at FROM attendance a JOIN users u ON u.id = a.student_id WHERE a.event_id = $1 ORDER BY a.created_at ASC").bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
