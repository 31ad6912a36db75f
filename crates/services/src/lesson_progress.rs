use std::sync::Arc;

use storage::repository::LessonProgressRepository;
use swim_core::model::{
    AuthSession, Lesson, LessonId, LessonSection, ProgressRecord, completion_percent,
};

use crate::error::ProgressError;

/// Outcome of pressing the lesson's primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStep {
    /// Moved the cursor to this section.
    Advanced(usize),
    /// Every section is now completed. `persisted` is false when the
    /// repository call failed; local state stays completed either way.
    Completed { persisted: bool },
    /// No sections, or the active section is already completed.
    Disabled,
}

/// Tracks the active section of one lesson and its completion.
///
/// Completion is optimistic: sections are flagged before the repository
/// is called and are never reverted.
pub struct SectionProgressTracker {
    lesson_id: LessonId,
    sections: Vec<LessonSection>,
    active_index: usize,
    session: AuthSession,
    progress: Arc<dyn LessonProgressRepository>,
    last_record: Option<ProgressRecord>,
}

impl SectionProgressTracker {
    pub const NEXT_LABEL: &'static str = "Следующий этап";
    pub const COMPLETE_LABEL: &'static str = "Завершить урок";

    #[must_use]
    pub fn new(
        lesson: &Lesson,
        session: AuthSession,
        progress: Arc<dyn LessonProgressRepository>,
    ) -> Self {
        Self {
            lesson_id: lesson.id().clone(),
            sections: lesson.sections().to_vec(),
            active_index: 0,
            session,
            progress,
            last_record: None,
        }
    }

    // Accessors
    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn sections(&self) -> &[LessonSection] {
        &self.sections
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&LessonSection> {
        self.sections.get(self.active_index)
    }

    /// Record returned by the last successful completion call.
    #[must_use]
    pub fn last_record(&self) -> Option<&ProgressRecord> {
        self.last_record.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(|s| s.completed)
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        completion_percent(&self.sections)
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.active_section().is_some_and(|s| !s.completed)
    }

    #[must_use]
    pub fn is_on_last(&self) -> bool {
        self.active_index + 1 >= self.sections.len()
    }

    /// Label of the primary action for the active section.
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        if self.is_on_last() {
            Self::COMPLETE_LABEL
        } else {
            Self::NEXT_LABEL
        }
    }

    /// Point the cursor at any section, backward included.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::SectionOutOfRange` when `index` is past the end.
    pub fn select_section(&mut self, index: usize) -> Result<(), ProgressError> {
        if index >= self.sections.len() {
            return Err(ProgressError::SectionOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        self.active_index = index;
        Ok(())
    }

    /// Advance to the next section, or complete the lesson from the last one.
    pub async fn advance_or_complete(&mut self) -> SectionStep {
        if !self.can_advance() {
            return SectionStep::Disabled;
        }
        if !self.is_on_last() {
            self.active_index += 1;
            tracing::debug!(
                lesson_id = %self.lesson_id,
                index = self.active_index,
                "section advanced"
            );
            return SectionStep::Advanced(self.active_index);
        }

        for section in &mut self.sections {
            section.completed = true;
        }

        match self.progress.complete(&self.session, &self.lesson_id).await {
            Ok(record) => {
                tracing::info!(
                    lesson_id = %self.lesson_id,
                    user_id = %self.session.user_id(),
                    "lesson completed"
                );
                self.last_record = Some(record);
                SectionStep::Completed { persisted: true }
            }
            Err(err) => {
                tracing::warn!(
                    lesson_id = %self.lesson_id,
                    error = %err,
                    "failed to record lesson completion"
                );
                SectionStep::Completed { persisted: false }
            }
        }
    }
}
