//! Grouping of lessons into the multi-week training plan.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use swim_core::model::week::week_title_and_description;
use swim_core::model::{Lesson, LessonId, ProgressRecord};

/// Lessons the user has completed, as reported by the progress repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionFacts {
    completed: HashSet<LessonId>,
}

impl CompletionFacts {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        Self {
            completed: records
                .iter()
                .filter(|r| r.completed)
                .map(|r| r.lesson_id.clone())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_completed(&self, id: &LessonId) -> bool {
        self.completed.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl FromIterator<LessonId> for CompletionFacts {
    fn from_iter<I: IntoIterator<Item = LessonId>>(iter: I) -> Self {
        Self {
            completed: iter.into_iter().collect(),
        }
    }
}

/// A lesson as placed in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLesson {
    pub lesson: Lesson,
    pub locked: bool,
    pub completed: bool,
}

/// Visual state of a week's badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeState {
    None,
    Partial,
    Complete,
}

/// One week of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub week_number: u32,
    pub title: String,
    pub description: String,
    pub lessons: Vec<PlanLesson>,
}

impl WeekBucket {
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.lessons.len()
    }

    /// `completed/total`, e.g. `2/5`.
    #[must_use]
    pub fn badge_label(&self) -> String {
        format!("{}/{}", self.completed_count(), self.total_count())
    }

    #[must_use]
    pub fn badge(&self) -> BadgeState {
        let completed = self.completed_count();
        if completed == 0 {
            BadgeState::None
        } else if completed == self.total_count() {
            BadgeState::Complete
        } else {
            BadgeState::Partial
        }
    }
}

/// Week buckets in ascending week order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainingPlan {
    pub weeks: Vec<WeekBucket>,
}

impl TrainingPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    #[must_use]
    pub fn week(&self, week_number: u32) -> Option<&WeekBucket> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.weeks.iter().map(WeekBucket::total_count).sum()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.weeks.iter().map(WeekBucket::completed_count).sum()
    }

    /// First unlocked lesson that is not completed, in plan order.
    #[must_use]
    pub fn next_lesson(&self) -> Option<&PlanLesson> {
        self.weeks
            .iter()
            .flat_map(|w| w.lessons.iter())
            .find(|l| !l.locked && !l.completed)
    }
}

/// Builds the training plan from a flat lesson list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanAggregator;

impl PlanAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn aggregate(&self, lessons: &[Lesson], facts: &CompletionFacts) -> TrainingPlan {
        let mut groups: BTreeMap<u32, Vec<&Lesson>> = BTreeMap::new();
        for lesson in lessons {
            groups
                .entry(lesson.placement().week())
                .or_default()
                .push(lesson);
        }

        let weeks = groups
            .into_iter()
            .map(|(week_number, mut group)| {
                // sort_by_key is stable: ties keep input order.
                group.sort_by_key(|l| l.placement().order_in_week());
                let (title, description) = week_title_and_description(week_number);
                WeekBucket {
                    week_number,
                    title,
                    description,
                    lessons: group.into_iter().map(|l| place(l, facts)).collect(),
                }
            })
            .collect();

        TrainingPlan { weeks }
    }
}

fn place(lesson: &Lesson, facts: &CompletionFacts) -> PlanLesson {
    PlanLesson {
        locked: lesson.locked_flag().unwrap_or(true),
        completed: lesson.completed_flag().unwrap_or(false) || facts.is_completed(lesson.id()),
        lesson: lesson.clone(),
    }
}
