use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use swim_core::Clock;
use swim_core::model::{
    AuthSession, Facets, Lesson, LessonId, LessonSection, PlanPlacement, Profile, ProfileUpdate,
    ProgressRecord, SectionKind, UserId,
};
use thiserror::Error;
use url::Url;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Section as it arrives from the remote store. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl SectionRecord {
    #[must_use]
    pub fn from_section(section: &LessonSection) -> Self {
        Self {
            title: Some(section.title.clone()),
            kind: Some(section.kind.as_tag().to_owned()),
            content: Some(section.content.clone()),
            image: section.image.as_ref().map(ToString::to_string),
            completed: Some(section.completed),
        }
    }

    /// Normalize into a domain section. Missing or unknown values fall back
    /// to defaults; nothing here fails.
    #[must_use]
    pub fn into_section(self) -> LessonSection {
        let kind = self
            .kind
            .as_deref()
            .and_then(SectionKind::from_tag)
            .unwrap_or_default();
        LessonSection::new(self.title.unwrap_or_default(), kind, self.content.unwrap_or_default())
            .with_image(parse_url("section image", self.image))
            .with_completed(self.completed.unwrap_or(false))
    }
}

/// Lesson row in the shape the remote store returns it.
///
/// Facets, placement and flags are optional on the wire. `into_lesson` is the
/// single place where their defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration: u32,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default, rename = "type")]
    pub training_type: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub week: Option<i64>,
    #[serde(default)]
    pub order_in_week: Option<i64>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub sections: Option<Vec<SectionRecord>>,
    pub created_at: DateTime<Utc>,
}

impl LessonRecord {
    /// Minimal record with only the required columns filled.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            duration,
            thumbnail_url: None,
            video_url: None,
            style: None,
            training_type: None,
            level: None,
            week: None,
            order_in_week: None,
            locked: None,
            completed: None,
            sections: None,
            created_at,
        }
    }

    #[must_use]
    pub fn from_lesson(lesson: &Lesson, created_at: DateTime<Utc>) -> Self {
        let placement = lesson.placement();
        Self {
            id: lesson.id().to_string(),
            title: lesson.title().to_owned(),
            description: lesson.description().map(str::to_owned),
            duration: lesson.duration_minutes(),
            thumbnail_url: lesson.thumbnail_url().map(ToString::to_string),
            video_url: lesson.video_url().map(ToString::to_string),
            style: Some(lesson.style().to_owned()),
            training_type: Some(lesson.training_type().to_owned()),
            level: Some(lesson.level().to_owned()),
            week: Some(i64::from(placement.week())),
            order_in_week: Some(i64::from(placement.order_in_week())),
            locked: lesson.locked_flag(),
            completed: lesson.completed_flag(),
            sections: Some(
                lesson
                    .sections()
                    .iter()
                    .map(SectionRecord::from_section)
                    .collect(),
            ),
            created_at,
        }
    }

    /// Convert the record into a fully typed `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when the id or title is blank or
    /// the duration is zero. Missing facets never fail.
    pub fn into_lesson(self) -> Result<Lesson, StorageError> {
        let id = LessonId::new(self.id).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let week = self.week.and_then(|w| u32::try_from(w).ok());
        let order = self.order_in_week.and_then(|o| i32::try_from(o).ok());
        let sections = self
            .sections
            .unwrap_or_default()
            .into_iter()
            .map(SectionRecord::into_section)
            .collect();

        let lesson = Lesson::new(id, self.title, self.duration)
            .map_err(|e| StorageError::Serialization(e.to_string()))?
            .with_description(self.description)
            .with_media(
                parse_url("thumbnail", self.thumbnail_url),
                parse_url("video", self.video_url),
            )
            .with_facets(Facets::from_optional(
                self.style,
                self.training_type,
                self.level,
            ))
            .with_sections(sections)
            .with_placement(PlanPlacement::new(week, order))
            .with_flags(self.locked, self.completed);
        Ok(lesson)
    }
}

/// Normalize a record for a listing. A record that cannot become a lesson is
/// skipped with a warning so one bad row does not hide the rest.
pub(crate) fn listed_lesson(record: LessonRecord) -> Option<Lesson> {
    let lesson_id = record.id.clone();
    match record.into_lesson() {
        Ok(lesson) => Some(lesson),
        Err(err) => {
            tracing::warn!(%lesson_id, error = %err, "skipping malformed lesson");
            None
        }
    }
}

fn parse_url(field: &'static str, raw: Option<String>) -> Option<Url> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::debug!(field, value = trimmed, error = %err, "dropping malformed url");
            None
        }
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Profile of the signed-in user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile of the session's user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport failures.
    async fn get(&self, session: &AuthSession) -> Result<Option<Profile>, StorageError>;

    /// Apply a partial update and return the stored profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update cannot be stored.
    async fn update(
        &self,
        session: &AuthSession,
        update: &ProfileUpdate,
    ) -> Result<Profile, StorageError>;
}

/// Read access to the lesson catalog, plus an upsert used for seeding.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// All lessons, oldest first. Rows that cannot be normalized are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport failures.
    async fn list(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Fetch a lesson by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record matches.
    async fn get(&self, id: &LessonId) -> Result<Lesson, StorageError>;

    /// Insert or replace a raw lesson record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_lesson(&self, record: &LessonRecord) -> Result<(), StorageError>;
}

/// Per-user lesson completion.
#[async_trait]
pub trait LessonProgressRepository: Send + Sync {
    /// Mark a lesson completed for the session's user.
    ///
    /// Idempotent: completing an already completed lesson returns the
    /// existing record unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown lesson, or other
    /// storage errors.
    async fn complete(
        &self,
        session: &AuthSession,
        lesson_id: &LessonId,
    ) -> Result<ProgressRecord, StorageError>;

    /// All progress records of the session's user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport failures.
    async fn list(&self, session: &AuthSession) -> Result<Vec<ProgressRecord>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    lessons: Arc<Mutex<Vec<LessonRecord>>>,
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    progress: Arc<Mutex<Vec<ProgressRecord>>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn get(&self, session: &AuthSession) -> Result<Option<Profile>, StorageError> {
        let guard = self.profiles.lock().map_err(poisoned)?;
        Ok(guard.get(&session.user_id()).cloned())
    }

    async fn update(
        &self,
        session: &AuthSession,
        update: &ProfileUpdate,
    ) -> Result<Profile, StorageError> {
        let now = self.clock.now();
        let mut guard = self.profiles.lock().map_err(poisoned)?;
        let profile = guard
            .entry(session.user_id())
            .or_insert_with(|| Profile::empty(session.user_id(), now));
        profile.apply(update, now);
        Ok(profile.clone())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn list(&self) -> Result<Vec<Lesson>, StorageError> {
        let mut records = self.lessons.lock().map_err(poisoned)?.clone();
        records.sort_by_key(|r| r.created_at);
        Ok(records.into_iter().filter_map(listed_lesson).collect())
    }

    async fn get(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        let record = {
            let guard = self.lessons.lock().map_err(poisoned)?;
            guard
                .iter()
                .find(|r| r.id.trim() == id.as_str())
                .cloned()
                .ok_or(StorageError::NotFound)?
        };
        record.into_lesson()
    }

    async fn upsert_lesson(&self, record: &LessonRecord) -> Result<(), StorageError> {
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => guard.push(record.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl LessonProgressRepository for InMemoryRepository {
    async fn complete(
        &self,
        session: &AuthSession,
        lesson_id: &LessonId,
    ) -> Result<ProgressRecord, StorageError> {
        let known = {
            let lessons = self.lessons.lock().map_err(poisoned)?;
            lessons.iter().any(|r| r.id.trim() == lesson_id.as_str())
        };
        if !known {
            return Err(StorageError::NotFound);
        }

        let user_id = session.user_id();
        let mut guard = self.progress.lock().map_err(poisoned)?;
        if let Some(existing) = guard
            .iter_mut()
            .find(|r| r.user_id == user_id && &r.lesson_id == lesson_id)
        {
            if !existing.completed {
                existing.completed = true;
                existing.completed_at = Some(self.clock.now());
            }
            return Ok(existing.clone());
        }

        let record = ProgressRecord::completed(user_id, lesson_id.clone(), self.clock.now());
        guard.push(record.clone());
        Ok(record)
    }

    async fn list(&self, session: &AuthSession) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|r| r.user_id == session.user_id())
            .cloned()
            .collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub progress: Arc<dyn LessonProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn LessonProgressRepository> = Arc::new(repo);
        Self {
            profiles,
            lessons,
            progress,
        }
    }
}
