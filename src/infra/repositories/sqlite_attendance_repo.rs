use crate::domain::{models::attendance::AttendanceEntry, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};

pub struct SqliteAttendanceRepo {
    pool: SqlitePool,
}

impl SqliteAttendanceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for SqliteAttendanceRepo {
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM attendance WHERE event_id = ?").bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceEntry>, AppError> {
        sqlx::query_as::<_, AttendanceEntry>(
            "SELECT a.id, a.student_id, u.display_name AS student_name, a.created_at
             FROM attendance a
             JOIN users u ON u.id = a.student_id
             WHERE a.event_id = ?
             ORDER BY a.created_at ASC"
        )
            .bind(event_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
