//! Repository doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storage::repository::{
    LessonProgressRepository, LessonRecord, LessonRepository, ProfileRepository, StorageError,
};
use swim_core::model::{
    AuthSession, Lesson, LessonId, Profile, ProfileUpdate, ProgressRecord, UserId,
};
use swim_core::time::fixed_now;

pub fn session() -> AuthSession {
    AuthSession::new(UserId::random(), Some("swimmer@example.com".into()), fixed_now())
}

pub fn lesson_id(raw: &str) -> LessonId {
    LessonId::new(raw).unwrap()
}

/// Every call fails with a connection error.
#[derive(Clone, Default)]
pub struct FailingRepository;

fn offline() -> StorageError {
    StorageError::Connection("offline".into())
}

#[async_trait]
impl ProfileRepository for FailingRepository {
    async fn get(&self, _session: &AuthSession) -> Result<Option<Profile>, StorageError> {
        Err(offline())
    }

    async fn update(
        &self,
        _session: &AuthSession,
        _update: &ProfileUpdate,
    ) -> Result<Profile, StorageError> {
        Err(offline())
    }
}

#[async_trait]
impl LessonRepository for FailingRepository {
    async fn list(&self) -> Result<Vec<Lesson>, StorageError> {
        Err(offline())
    }

    async fn get(&self, _id: &LessonId) -> Result<Lesson, StorageError> {
        Err(offline())
    }

    async fn upsert_lesson(&self, _record: &LessonRecord) -> Result<(), StorageError> {
        Err(offline())
    }
}

#[async_trait]
impl LessonProgressRepository for FailingRepository {
    async fn complete(
        &self,
        _session: &AuthSession,
        _lesson_id: &LessonId,
    ) -> Result<ProgressRecord, StorageError> {
        Err(offline())
    }

    async fn list(&self, _session: &AuthSession) -> Result<Vec<ProgressRecord>, StorageError> {
        Err(offline())
    }
}

/// Counts `complete` calls and optionally fails them.
#[derive(Clone, Default)]
pub struct CountingProgress {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingProgress {
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LessonProgressRepository for CountingProgress {
    async fn complete(
        &self,
        session: &AuthSession,
        lesson_id: &LessonId,
    ) -> Result<ProgressRecord, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(offline());
        }
        Ok(ProgressRecord::completed(
            session.user_id(),
            lesson_id.clone(),
            fixed_now(),
        ))
    }

    async fn list(&self, _session: &AuthSession) -> Result<Vec<ProgressRecord>, StorageError> {
        Ok(Vec::new())
    }
}

/// Serves a fixed lesson list after a delay.
#[derive(Clone)]
pub struct DelayedLessons {
    pub delay: Duration,
    pub lessons: Vec<Lesson>,
}

#[async_trait]
impl LessonRepository for DelayedLessons {
    async fn list(&self) -> Result<Vec<Lesson>, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.lessons.clone())
    }

    async fn get(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.lessons
            .iter()
            .find(|l| l.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_lesson(&self, _record: &LessonRecord) -> Result<(), StorageError> {
        Err(StorageError::Conflict)
    }
}
