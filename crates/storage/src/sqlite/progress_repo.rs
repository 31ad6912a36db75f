use swim_core::model::{AuthSession, LessonId, ProgressRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_progress_row};
use crate::repository::{LessonProgressRepository, StorageError};

#[async_trait::async_trait]
impl LessonProgressRepository for SqliteRepository {
    async fn complete(
        &self,
        session: &AuthSession,
        lesson_id: &LessonId,
    ) -> Result<ProgressRecord, StorageError> {
        let user_id = session.user_id().to_string();
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let known = sqlx::query("SELECT 1 FROM lessons WHERE id = ?1")
            .bind(lesson_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if known.is_none() {
            return Err(StorageError::NotFound);
        }

        // The first completion timestamp wins.
        sqlx::query(
            r"
            INSERT INTO lesson_progress (user_id, lesson_id, completed, completed_at)
            VALUES (?1, ?2, 1, ?3)
            ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                completed = 1,
                completed_at = COALESCE(lesson_progress.completed_at, excluded.completed_at)
            ",
        )
        .bind(&user_id)
        .bind(lesson_id.as_str())
        .bind(self.clock.now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        let row = sqlx::query(
            r"
            SELECT user_id, lesson_id, completed, completed_at
            FROM lesson_progress WHERE user_id = ?1 AND lesson_id = ?2
            ",
        )
        .bind(&user_id)
        .bind(lesson_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        map_progress_row(&row)
    }

    async fn list(&self, session: &AuthSession) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, lesson_id, completed, completed_at
            FROM lesson_progress
            WHERE user_id = ?1
            ORDER BY completed_at ASC, lesson_id ASC
            ",
        )
        .bind(session.user_id().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_progress_row(&row)?);
        }
        Ok(records)
    }
}
