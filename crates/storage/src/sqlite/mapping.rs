use std::collections::BTreeMap;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use swim_core::model::{Answer, LessonId, Profile, ProgressRecord, UserId};

use crate::repository::{LessonRecord, SectionRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn user_id_from_str(raw: &str) -> Result<UserId, StorageError> {
    raw.parse::<UserId>().map_err(ser)
}

pub(crate) fn sections_to_json(
    sections: Option<&Vec<SectionRecord>>,
) -> Result<Option<String>, StorageError> {
    sections.map(serde_json::to_string).transpose().map_err(ser)
}

pub(crate) fn onboarding_to_json(
    onboarding: &BTreeMap<String, Answer>,
) -> Result<String, StorageError> {
    serde_json::to_string(onboarding).map_err(ser)
}

/// Sections that are not a JSON array of section objects read as none.
fn sections_from_json(lesson_id: &str, raw: &str) -> Option<Vec<SectionRecord>> {
    match serde_json::from_str::<Vec<SectionRecord>>(raw) {
        Ok(sections) => Some(sections),
        Err(err) => {
            tracing::warn!(lesson_id, error = %err, "ignoring unreadable sections");
            None
        }
    }
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<LessonRecord, StorageError> {
    let duration_i64: i64 = row.try_get("duration").map_err(ser)?;
    let duration = u32::try_from(duration_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid duration: {duration_i64}")))?;

    let id: String = row.try_get("id").map_err(ser)?;
    let sections = row
        .try_get::<Option<String>, _>("sections")
        .map_err(ser)?
        .and_then(|raw| sections_from_json(&id, &raw));

    Ok(LessonRecord {
        id,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        duration,
        thumbnail_url: row.try_get("thumbnail_url").map_err(ser)?,
        video_url: row.try_get("video_url").map_err(ser)?,
        style: row.try_get("style").map_err(ser)?,
        training_type: row.try_get("type").map_err(ser)?,
        level: row.try_get("level").map_err(ser)?,
        week: row.try_get("week").map_err(ser)?,
        order_in_week: row.try_get("order_in_week").map_err(ser)?,
        locked: row.try_get("locked").map_err(ser)?,
        completed: row.try_get("completed").map_err(ser)?,
        sections,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<Profile, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let onboarding_raw: String = row.try_get("onboarding").map_err(ser)?;
    let onboarding: BTreeMap<String, Answer> =
        serde_json::from_str(&onboarding_raw).map_err(ser)?;

    Ok(Profile {
        id: user_id_from_str(&id)?,
        email: row.try_get("email").map_err(ser)?,
        full_name: row.try_get("full_name").map_err(ser)?,
        avatar_url: row.try_get("avatar_url").map_err(ser)?,
        onboarding,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    let lesson_id: String = row.try_get("lesson_id").map_err(ser)?;
    Ok(ProgressRecord {
        user_id: user_id_from_str(&user_id)?,
        lesson_id: LessonId::new(lesson_id).map_err(ser)?,
        completed: row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}
