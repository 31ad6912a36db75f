use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::step::StepKind;

/// A single wizard answer. The variant always matches the step kind:
/// free-text and single-select steps hold `Text`, multi-select steps hold
/// `Choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choices(BTreeSet<String>),
}

impl Answer {
    /// The empty answer a step starts with.
    #[must_use]
    pub fn empty_for(kind: StepKind) -> Self {
        match kind {
            StepKind::MultiSelect => Answer::Choices(BTreeSet::new()),
            StepKind::Text | StepKind::Email | StepKind::SingleSelect => {
                Answer::Text(String::new())
            }
        }
    }

    #[must_use]
    pub fn fits(&self, kind: StepKind) -> bool {
        matches!(
            (self, kind),
            (Answer::Choices(_), StepKind::MultiSelect)
                | (
                    Answer::Text(_),
                    StepKind::Text | StepKind::Email | StepKind::SingleSelect
                )
        )
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            Answer::Choices(_) => None,
        }
    }

    #[must_use]
    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            Answer::Choices(choices) => Some(choices),
            Answer::Text(_) => None,
        }
    }

    /// True for an empty string or an empty set. Whitespace is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(text) => text.is_empty(),
            Answer::Choices(choices) => choices.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_matches_kind() {
        for kind in [
            StepKind::Text,
            StepKind::Email,
            StepKind::SingleSelect,
            StepKind::MultiSelect,
        ] {
            let answer = Answer::empty_for(kind);
            assert!(answer.fits(kind));
            assert!(answer.is_empty());
        }
        assert!(!Answer::empty_for(StepKind::Text).fits(StepKind::MultiSelect));
    }

    #[test]
    fn serializes_as_plain_json() {
        let text = serde_json::to_value(Answer::Text("2 раза".into())).unwrap();
        assert_eq!(text, serde_json::json!("2 раза"));

        let choices = Answer::Choices(["Доска".to_owned(), "Ласты".to_owned()].into());
        let value = serde_json::to_value(&choices).unwrap();
        assert_eq!(value, serde_json::json!(["Доска", "Ласты"]));
        let back: Answer = serde_json::from_value(value).unwrap();
        assert_eq!(back, choices);
    }
}
