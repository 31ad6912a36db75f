use std::collections::BTreeMap;

use swim_core::model::{Answer, OnboardingStep, StepCatalog, StepKind};

use crate::error::OnboardingError;

/// Answers of one wizard session, keyed by step id.
///
/// Every step of the catalog has an entry from construction on, and each
/// entry always has the shape its step kind dictates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerStore {
    answers: BTreeMap<String, Answer>,
}

impl AnswerStore {
    #[must_use]
    pub fn new(catalog: &StepCatalog) -> Self {
        let answers = catalog
            .steps()
            .iter()
            .map(|step| (step.id().to_owned(), Answer::empty_for(step.kind())))
            .collect();
        Self { answers }
    }

    #[must_use]
    pub fn get(&self, step_id: &str) -> Option<&Answer> {
        self.answers.get(step_id)
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(id, answer)| (id.as_str(), answer))
    }

    /// Stores `text` verbatim on a free-text or email step.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::KindMismatch` for select steps.
    pub fn set_text(&mut self, step: &OnboardingStep, text: String) -> Result<(), OnboardingError> {
        if !step.kind().is_free_text() {
            return Err(mismatch(step));
        }
        self.answers.insert(step.id().to_owned(), Answer::Text(text));
        Ok(())
    }

    /// Overwrites the answer of a single-select step.
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` unless the step is single-select and
    /// `InvalidOption` when `value` is not one of its options.
    pub fn select_single(
        &mut self,
        step: &OnboardingStep,
        value: &str,
    ) -> Result<(), OnboardingError> {
        if step.kind() != StepKind::SingleSelect {
            return Err(mismatch(step));
        }
        check_option(step, value)?;
        self.answers.insert(step.id().to_owned(), Answer::Text(value.to_owned()));
        Ok(())
    }

    /// Toggles `value` in a multi-select answer. Returns whether the value is
    /// selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` unless the step is multi-select and
    /// `InvalidOption` when `value` is not one of its options.
    pub fn toggle_choice(
        &mut self,
        step: &OnboardingStep,
        value: &str,
    ) -> Result<bool, OnboardingError> {
        if step.kind() != StepKind::MultiSelect {
            return Err(mismatch(step));
        }
        check_option(step, value)?;

        let entry = self
            .answers
            .entry(step.id().to_owned())
            .or_insert_with(|| Answer::empty_for(StepKind::MultiSelect));
        let Answer::Choices(choices) = entry else {
            return Err(mismatch(step));
        };
        if choices.remove(value) {
            Ok(false)
        } else {
            choices.insert(value.to_owned());
            Ok(true)
        }
    }

    #[must_use]
    pub fn is_selected(&self, step_id: &str, option: &str) -> bool {
        match self.answers.get(step_id) {
            Some(Answer::Text(text)) => text == option,
            Some(Answer::Choices(choices)) => choices.contains(option),
            None => false,
        }
    }

    /// Whether the stored answer lets the wizard move past `step`.
    #[must_use]
    pub fn satisfies(&self, step: &OnboardingStep) -> bool {
        if step.is_optional() {
            return true;
        }
        match (step.kind(), self.answers.get(step.id())) {
            (StepKind::Text | StepKind::Email, Some(Answer::Text(text))) => {
                !text.trim().is_empty()
            }
            (StepKind::SingleSelect, Some(Answer::Text(text))) => !text.is_empty(),
            (StepKind::MultiSelect, Some(Answer::Choices(choices))) => !choices.is_empty(),
            _ => false,
        }
    }
}

fn mismatch(step: &OnboardingStep) -> OnboardingError {
    OnboardingError::KindMismatch {
        step_id: step.id().to_owned(),
        kind: step.kind(),
    }
}

fn check_option(step: &OnboardingStep, value: &str) -> Result<(), OnboardingError> {
    if step.has_option(value) {
        Ok(())
    } else {
        Err(OnboardingError::InvalidOption {
            step_id: step.id().to_owned(),
            value: value.to_owned(),
        })
    }
}
