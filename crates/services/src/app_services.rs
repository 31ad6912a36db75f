use std::sync::Arc;

use storage::repository::Storage;
use swim_core::model::{AuthSession, Lesson, UserId};
use swim_core::onboarding::default_catalog;

use crate::Clock;
use crate::config::OnboardingConfig;
use crate::error::AppServicesError;
use crate::lesson_progress::SectionProgressTracker;
use crate::onboarding::OnboardingEngine;
use crate::plan::TrainingPlan;
use crate::view::{self, ViewState};

/// Assembles the engines over one storage backend and owns the signed-in
/// session.
pub struct AppServices {
    clock: Clock,
    config: OnboardingConfig,
    storage: Storage,
    session: Option<AuthSession>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: Storage, clock: Clock, config: OnboardingConfig) -> Self {
        Self {
            clock,
            config,
            storage,
            session: None,
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(Storage::in_memory(), clock, OnboardingConfig::default())
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: OnboardingConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage, clock, config))
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a session for `user_id`, replacing any previous one.
    pub fn sign_in(&mut self, user_id: UserId, email: Option<String>) -> &AuthSession {
        let session = AuthSession::new(user_id, email, self.clock.now());
        tracing::info!(%user_id, "signed in");
        self.session.insert(session)
    }

    /// Drop the current session. Returns it if there was one.
    pub fn sign_out(&mut self) -> Option<AuthSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            tracing::info!(user_id = %session.user_id(), "signed out");
        }
        session
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::NotSignedIn` without a session.
    pub fn session(&self) -> Result<&AuthSession, AppServicesError> {
        self.session.as_ref().ok_or(AppServicesError::NotSignedIn)
    }

    /// A fresh wizard over the default questionnaire.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` without a session, or a catalog error if the
    /// questionnaire is inconsistent.
    pub fn onboarding(&self) -> Result<OnboardingEngine, AppServicesError> {
        let session = self.session()?.clone();
        let engine = OnboardingEngine::new(
            default_catalog()?,
            session,
            Arc::clone(&self.storage.profiles),
            self.clock,
            self.config,
        )?;
        Ok(engine)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::NotSignedIn` without a session.
    pub fn lesson_tracker(
        &self,
        lesson: &Lesson,
    ) -> Result<SectionProgressTracker, AppServicesError> {
        let session = self.session()?.clone();
        Ok(SectionProgressTracker::new(
            lesson,
            session,
            Arc::clone(&self.storage.progress),
        ))
    }

    pub async fn catalog(&self) -> ViewState<Vec<Lesson>> {
        view::load_catalog(self.storage.lessons.as_ref()).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::NotSignedIn` without a session.
    pub async fn plan(&self) -> Result<ViewState<TrainingPlan>, AppServicesError> {
        let session = self.session()?;
        Ok(view::load_plan(
            self.storage.lessons.as_ref(),
            self.storage.progress.as_ref(),
            session,
        )
        .await)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::NotSignedIn` without a session.
    pub async fn lesson(&self, raw_id: &str) -> Result<ViewState<Lesson>, AppServicesError> {
        let session = self.session()?;
        Ok(view::load_lesson(
            self.storage.lessons.as_ref(),
            self.storage.progress.as_ref(),
            session,
            raw_id,
        )
        .await)
    }
}
