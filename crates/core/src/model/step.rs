use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error("step id cannot be empty")]
    EmptyId,

    #[error("step `{id}` has an empty title")]
    EmptyTitle { id: String },

    #[error("select step `{id}` needs at least one option")]
    MissingOptions { id: String },

    #[error("free-text step `{id}` cannot carry options")]
    UnexpectedOptions { id: String },

    #[error("step `{id}` lists option `{option}` twice")]
    DuplicateOption { id: String, option: String },

    #[error("duplicate step id `{id}`")]
    DuplicateStep { id: String },
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// How a step collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Text,
    Email,
    SingleSelect,
    MultiSelect,
}

impl StepKind {
    #[must_use]
    pub fn is_select(self) -> bool {
        matches!(self, StepKind::SingleSelect | StepKind::MultiSelect)
    }

    #[must_use]
    pub fn is_free_text(self) -> bool {
        matches!(self, StepKind::Text | StepKind::Email)
    }
}

/// One question of the onboarding wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStep {
    id: String,
    title: String,
    description: Option<String>,
    kind: StepKind,
    options: Vec<String>,
    optional: bool,
}

impl OnboardingStep {
    /// Creates a validated step.
    ///
    /// # Errors
    ///
    /// Returns `StepError` when the id or title is blank, when a select step
    /// has no options, when a free-text step has options, or when an option
    /// repeats.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: StepKind,
        options: Vec<String>,
    ) -> Result<Self, StepError> {
        let id = id.into().trim().to_owned();
        if id.is_empty() {
            return Err(StepError::EmptyId);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(StepError::EmptyTitle { id });
        }

        if kind.is_select() && options.is_empty() {
            return Err(StepError::MissingOptions { id });
        }
        if kind.is_free_text() && !options.is_empty() {
            return Err(StepError::UnexpectedOptions { id });
        }
        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(StepError::DuplicateOption {
                    id,
                    option: option.clone(),
                });
            }
        }

        Ok(Self {
            id,
            title,
            description: None,
            kind,
            options,
            optional: false,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
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
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Immutable ordered list of wizard steps with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<OnboardingStep>,
}

impl StepCatalog {
    /// # Errors
    ///
    /// Returns `StepError::DuplicateStep` if two steps share an id.
    pub fn new(steps: Vec<OnboardingStep>) -> Result<Self, StepError> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id()) {
                return Err(StepError::DuplicateStep {
                    id: step.id().to_owned(),
                });
            }
        }
        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[OnboardingStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OnboardingStep> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<(usize, &OnboardingStep)> {
        self.steps.iter().enumerate().find(|(_, s)| s.id() == id)
    }
}
