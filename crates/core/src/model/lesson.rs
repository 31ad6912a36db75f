use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::facet::Facets;
use crate::model::ids::LessonId;
use crate::model::section::{LessonSection, completion_percent};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson duration must be > 0 minutes")]
    ZeroDuration,
}

//
// ─── PLACEMENT ─────────────────────────────────────────────────────────────────
//

/// Where a lesson sits in the multi-week plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPlacement {
    week: u32,
    order_in_week: i32,
}

impl PlanPlacement {
    pub const DEFAULT_WEEK: u32 = 1;

    /// Week 0 and a missing week both land in week 1.
    #[must_use]
    pub fn new(week: Option<u32>, order_in_week: Option<i32>) -> Self {
        Self {
            week: week.filter(|w| *w > 0).unwrap_or(Self::DEFAULT_WEEK),
            order_in_week: order_in_week.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn week(&self) -> u32 {
        self.week
    }

    #[must_use]
    pub fn order_in_week(&self) -> i32 {
        self.order_in_week
    }
}

impl Default for PlanPlacement {
    fn default() -> Self {
        Self::new(None, None)
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A fully normalized lesson.
///
/// Every optional facet of the remote record has already been defaulted, so
/// consumers never see a partially populated lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: Option<String>,
    duration_minutes: u32,
    thumbnail_url: Option<Url>,
    video_url: Option<Url>,
    facets: Facets,
    sections: Vec<LessonSection>,
    placement: PlanPlacement,
    locked: Option<bool>,
    completed: Option<bool>,
}

impl Lesson {
    /// Creates a lesson with default facets, no sections and default placement.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` for a blank title and
    /// `LessonError::ZeroDuration` when `duration_minutes` is 0.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if duration_minutes == 0 {
            return Err(LessonError::ZeroDuration);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: None,
            duration_minutes,
            thumbnail_url: None,
            video_url: None,
            facets: Facets::default(),
            sections: Vec::new(),
            placement: PlanPlacement::default(),
            locked: None,
            completed: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        self
    }

    #[must_use]
    pub fn with_media(mut self, thumbnail_url: Option<Url>, video_url: Option<Url>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self.video_url = video_url;
        self
    }

    #[must_use]
    pub fn with_facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    #[must_use]
    pub fn with_sections(mut self, sections: Vec<LessonSection>) -> Self {
        self.sections = sections;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: PlanPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Lock/completion flags as supplied by the source record, if any.
    #[must_use]
    pub fn with_flags(mut self, locked: Option<bool>, completed: Option<bool>) -> Self {
        self.locked = locked;
        self.completed = completed;
        self
    }

    /// Marks every section completed, as recorded by a finished lesson.
    #[must_use]
    pub fn into_completed(mut self) -> Self {
        for section in &mut self.sections {
            section.completed = true;
        }
        self.completed = Some(true);
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&Url> {
        self.thumbnail_url.as_ref()
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&Url> {
        self.video_url.as_ref()
    }

    #[must_use]
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn style(&self) -> &str {
        &self.facets.style
    }

    #[must_use]
    pub fn training_type(&self) -> &str {
        &self.facets.training_type
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.facets.level
    }

    #[must_use]
    pub fn sections(&self) -> &[LessonSection] {
        &self.sections
    }

    #[must_use]
    pub fn placement(&self) -> PlanPlacement {
        self.placement
    }

    #[must_use]
    pub fn locked_flag(&self) -> Option<bool> {
        self.locked
    }

    #[must_use]
    pub fn completed_flag(&self) -> Option<bool> {
        self.completed
    }

    /// Progress in percent, always derived from completed sections.
    #[must_use]
    pub fn progress(&self) -> u8 {
        completion_percent(&self.sections)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::SectionKind;

    fn id(raw: &str) -> LessonId {
        LessonId::new(raw).unwrap()
    }

    #[test]
    fn new_rejects_empty_title() {
        let err = Lesson::new(id("L1"), "  ", 30).unwrap_err();
        assert_eq!(err, LessonError::EmptyTitle);
    }

    #[test]
    fn new_rejects_zero_duration() {
        let err = Lesson::new(id("L1"), "Скольжение", 0).unwrap_err();
        assert_eq!(err, LessonError::ZeroDuration);
    }

    #[test]
    fn defaults_are_applied() {
        let lesson = Lesson::new(id("L1"), " Скольжение ", 30).unwrap();
        assert_eq!(lesson.title(), "Скольжение");
        assert_eq!(lesson.style(), Facets::DEFAULT_STYLE);
        assert_eq!(lesson.training_type(), Facets::DEFAULT_TRAINING_TYPE);
        assert_eq!(lesson.level(), Facets::DEFAULT_LEVEL);
        assert_eq!(lesson.placement().week(), 1);
        assert_eq!(lesson.placement().order_in_week(), 0);
        assert_eq!(lesson.locked_flag(), None);
        assert_eq!(lesson.progress(), 0);
    }

    #[test]
    fn blank_description_is_dropped() {
        let lesson = Lesson::new(id("L1"), "Дыхание", 20)
            .unwrap()
            .with_description(Some("   ".into()));
        assert_eq!(lesson.description(), None);
    }

    #[test]
    fn week_zero_lands_in_week_one() {
        let placement = PlanPlacement::new(Some(0), Some(3));
        assert_eq!(placement.week(), 1);
        assert_eq!(placement.order_in_week(), 3);
    }

    #[test]
    fn progress_follows_sections() {
        let lesson = Lesson::new(id("L1"), "Работа ног", 30)
            .unwrap()
            .with_sections(vec![
                LessonSection::new("a", SectionKind::Warmup, "").with_completed(true),
                LessonSection::new("b", SectionKind::Main, "").with_completed(true),
            ]);
        assert_eq!(lesson.progress(), 100);
    }

    #[test]
    fn into_completed_fills_every_section() {
        let lesson = Lesson::new(id("L1"), "Работа рук", 30)
            .unwrap()
            .with_sections(vec![
                LessonSection::new("a", SectionKind::Warmup, ""),
                LessonSection::new("b", SectionKind::Main, ""),
                LessonSection::new("c", SectionKind::Cooldown, ""),
            ])
            .into_completed();
        assert_eq!(lesson.progress(), 100);
        assert_eq!(lesson.completed_flag(), Some(true));
    }
}
