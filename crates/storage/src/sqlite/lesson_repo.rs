use sqlx::Row;
use swim_core::model::{Lesson, LessonId};

use super::SqliteRepository;
use super::mapping::{conn, map_lesson_row, sections_to_json};
use crate::repository::{LessonRecord, LessonRepository, StorageError, listed_lesson};

const LESSON_COLUMNS: &str = "id, title, description, duration, thumbnail_url, video_url, \
     style, type, level, week, order_in_week, locked, completed, sections, created_at";

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn list(&self) -> Result<Vec<Lesson>, StorageError> {
        let sql = format!("SELECT {LESSON_COLUMNS} FROM lessons ORDER BY created_at ASC, id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut lessons = Vec::with_capacity(rows.len());
        for row in rows {
            match map_lesson_row(&row) {
                Ok(record) => lessons.extend(listed_lesson(record)),
                Err(err) => {
                    let lesson_id: String = row.try_get("id").unwrap_or_default();
                    tracing::warn!(%lesson_id, error = %err, "skipping unreadable lesson row");
                }
            }
        }
        Ok(lessons)
    }

    async fn get(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        let sql = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => map_lesson_row(&row)?.into_lesson(),
            None => Err(StorageError::NotFound),
        }
    }

    async fn upsert_lesson(&self, record: &LessonRecord) -> Result<(), StorageError> {
        let sections = sections_to_json(record.sections.as_ref())?;

        sqlx::query(
            r"
            INSERT INTO lessons (id, title, description, duration, thumbnail_url, video_url,
                                 style, type, level, week, order_in_week, locked, completed,
                                 sections, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                duration = excluded.duration,
                thumbnail_url = excluded.thumbnail_url,
                video_url = excluded.video_url,
                style = excluded.style,
                type = excluded.type,
                level = excluded.level,
                week = excluded.week,
                order_in_week = excluded.order_in_week,
                locked = excluded.locked,
                completed = excluded.completed,
                sections = excluded.sections
            ",
        )
        .bind(record.id.trim())
        .bind(&record.title)
        .bind(&record.description)
        .bind(i64::from(record.duration))
        .bind(&record.thumbnail_url)
        .bind(&record.video_url)
        .bind(&record.style)
        .bind(&record.training_type)
        .bind(&record.level)
        .bind(record.week)
        .bind(record.order_in_week)
        .bind(record.locked)
        .bind(record.completed)
        .bind(sections)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}
