use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, UserId};

/// Per-user completion record for one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn completed(user_id: UserId, lesson_id: LessonId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            lesson_id,
            completed: true,
            completed_at: Some(at),
        }
    }
}
