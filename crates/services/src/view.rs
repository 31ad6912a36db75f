//! Tri-state screen loading on top of the repositories.
//!
//! Loaders never fail: repository errors are logged and turned into a
//! `ViewState::Error` carrying a localized message.

use std::sync::{Arc, Mutex, Weak};

use storage::repository::{LessonProgressRepository, LessonRepository, StorageError};
use swim_core::model::{AuthSession, Lesson, LessonId};

use crate::plan::{CompletionFacts, PlanAggregator, TrainingPlan};

/// Shown when a catalog query leaves nothing to display.
pub const EMPTY_CATALOG_MESSAGE: &str = "Уроки не найдены";

/// Screen a load failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Plan,
    Lesson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// The repository failed; the user may retry later.
    Unavailable(Screen),
    NotFound,
    InvalidLessonId,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unavailable(Screen::Catalog) => {
                "Не удалось загрузить уроки. Пожалуйста, попробуйте позже."
            }
            ViewError::Unavailable(Screen::Plan) => {
                "Не удалось загрузить план обучения. Пожалуйста, попробуйте позже."
            }
            ViewError::Unavailable(Screen::Lesson) => {
                "Не удалось загрузить урок. Пожалуйста, попробуйте позже."
            }
            ViewError::NotFound => "Урок не найден",
            ViewError::InvalidLessonId => "Некорректный идентификатор урока",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            ViewState::Loading | ViewState::Error(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        match self {
            ViewState::Error(err) => Some(*err),
            ViewState::Loading | ViewState::Ready(_) => None,
        }
    }
}

//
// ─── LOADERS ───────────────────────────────────────────────────────────────────
//

pub async fn load_catalog(lessons: &dyn LessonRepository) -> ViewState<Vec<Lesson>> {
    match lessons.list().await {
        Ok(list) => ViewState::Ready(list),
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch lessons");
            ViewState::Error(ViewError::Unavailable(Screen::Catalog))
        }
    }
}

/// Load lessons and the user's progress and build the plan.
///
/// A failing progress list degrades to a plan without completion facts.
pub async fn load_plan(
    lessons: &dyn LessonRepository,
    progress: &dyn LessonProgressRepository,
    session: &AuthSession,
) -> ViewState<TrainingPlan> {
    let list = match lessons.list().await {
        Ok(list) => list,
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch or process plan data");
            return ViewState::Error(ViewError::Unavailable(Screen::Plan));
        }
    };

    let facts = match progress.list(session).await {
        Ok(records) => CompletionFacts::from_records(&records),
        Err(err) => {
            tracing::warn!(
                user_id = %session.user_id(),
                error = %err,
                "progress unavailable, plan shown without completions"
            );
            CompletionFacts::none()
        }
    };

    ViewState::Ready(PlanAggregator::new().aggregate(&list, &facts))
}

/// Load one lesson for the session's user.
///
/// Completion recorded in the progress repository wins over the section
/// flags of the lesson record, so a finished lesson reopens at 100%. A
/// failing progress list leaves the record as stored.
pub async fn load_lesson(
    lessons: &dyn LessonRepository,
    progress: &dyn LessonProgressRepository,
    session: &AuthSession,
    raw_id: &str,
) -> ViewState<Lesson> {
    let Ok(id) = LessonId::new(raw_id) else {
        return ViewState::Error(ViewError::InvalidLessonId);
    };
    let lesson = match lessons.get(&id).await {
        Ok(lesson) => lesson,
        Err(StorageError::NotFound) => return ViewState::Error(ViewError::NotFound),
        Err(err) => {
            tracing::error!(lesson_id = %id, error = %err, "failed to fetch lesson");
            return ViewState::Error(ViewError::Unavailable(Screen::Lesson));
        }
    };

    match progress.list(session).await {
        Ok(records) if records.iter().any(|r| r.completed && r.lesson_id == id) => {
            ViewState::Ready(lesson.into_completed())
        }
        Ok(_) => ViewState::Ready(lesson),
        Err(err) => {
            tracing::warn!(lesson_id = %id, error = %err, "progress unavailable for lesson");
            ViewState::Ready(lesson)
        }
    }
}

//
// ─── SLOTS ─────────────────────────────────────────────────────────────────────
//

/// Holds the state a mounted screen renders.
///
/// In-flight requests get a weak [`SlotHandle`]; once the slot is dropped
/// their results are discarded. Concurrent requests are not ordered: the
/// last one to resolve wins.
pub struct ScreenSlot<T> {
    state: Arc<Mutex<ViewState<T>>>,
}

impl<T> Default for ScreenSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScreenSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState::Loading)),
        }
    }

    /// Handle for a request that starts without resetting the state.
    #[must_use]
    pub fn handle(&self) -> SlotHandle<T> {
        SlotHandle {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Reset to `Loading` and hand out a handle for the new request.
    pub fn begin(&self) -> SlotHandle<T> {
        if let Ok(mut guard) = self.state.lock() {
            *guard = ViewState::Loading;
        }
        self.handle()
    }
}

impl<T: Clone> ScreenSlot<T> {
    #[must_use]
    pub fn snapshot(&self) -> ViewState<T> {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Write side of a [`ScreenSlot`] held by an in-flight request.
pub struct SlotHandle<T> {
    state: Weak<Mutex<ViewState<T>>>,
}

impl<T> Clone for SlotHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T> SlotHandle<T> {
    /// Deliver a result. Returns false when the screen is gone.
    pub fn resolve(&self, state: ViewState<T>) -> bool {
        let Some(slot) = self.state.upgrade() else {
            tracing::debug!("screen unmounted, dropping late result");
            return false;
        };
        match slot.lock() {
            Ok(mut guard) => {
                *guard = state;
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.strong_count() > 0
    }
}
