//! Text and facet filtering of the lesson catalog.

use serde::{Deserialize, Serialize};
use swim_core::model::Lesson;

/// Facet labels picked in the filter panel, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    labels: Vec<String>,
}

impl FacetSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `label`, or unselects it when already selected. Returns
    /// whether the label is selected afterwards.
    pub fn toggle(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if let Some(pos) = self.labels.iter().position(|l| *l == label) {
            self.labels.remove(pos);
            false
        } else {
            self.labels.push(label);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl<S: Into<String>> FromIterator<S> for FacetSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for label in iter {
            let label = label.into();
            if !selection.contains(&label) {
                selection.labels.push(label);
            }
        }
        selection
    }
}

/// Free-text query plus facet selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: String,
    pub facets: FacetSelection,
}

impl CatalogQuery {
    #[must_use]
    pub fn new(text: impl Into<String>, facets: FacetSelection) -> Self {
        Self {
            text: text.into(),
            facets,
        }
    }

    /// Whether `lesson` passes both the text rule and the facet rule.
    #[must_use]
    pub fn matches(&self, lesson: &Lesson) -> bool {
        matches_text(lesson, &self.text) && matches_facets(lesson, &self.facets)
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive substring match over title, description and facets.
/// An empty query matches every lesson.
#[must_use]
pub fn matches_text(lesson: &Lesson, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    contains_ci(lesson.title(), &needle)
        || lesson
            .description()
            .is_some_and(|d| contains_ci(d, &needle))
        || lesson.facets().values().any(|v| contains_ci(v, &needle))
}

/// Any selected label must appear in any facet value. An empty selection
/// matches every lesson.
#[must_use]
pub fn matches_facets(lesson: &Lesson, selection: &FacetSelection) -> bool {
    if selection.is_empty() {
        return true;
    }
    selection.labels().iter().any(|label| {
        let needle = label.to_lowercase();
        lesson.facets().values().any(|v| contains_ci(v, &needle))
    })
}

/// Stable filter: survivors keep their relative order.
#[must_use]
pub fn filter_lessons(lessons: &[Lesson], query: &CatalogQuery) -> Vec<Lesson> {
    lessons
        .iter()
        .filter(|lesson| query.matches(lesson))
        .cloned()
        .collect()
}
