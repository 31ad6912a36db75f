use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::Answer;
use crate::model::ids::UserId;

/// A user profile as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Onboarding answers keyed by step id.
    #[serde(default)]
    pub onboarding: BTreeMap<String, Answer>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn empty(id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: None,
            full_name: None,
            avatar_url: None,
            onboarding: BTreeMap::new(),
            updated_at: now,
        }
    }

    /// Applies a partial update. Absent fields keep their current value;
    /// onboarding answers are merged per step id.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        if let Some(email) = &update.email {
            self.email = Some(email.clone());
        }
        if let Some(full_name) = &update.full_name {
            self.full_name = Some(full_name.clone());
        }
        for (step_id, answer) in &update.onboarding {
            self.onboarding.insert(step_id.clone(), answer.clone());
        }
        self.updated_at = now;
    }
}

/// Partial profile sent to the profile repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub onboarding: BTreeMap<String, Answer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn apply_merges_and_keeps_absent_fields() {
        let mut profile = Profile::empty(UserId::random(), fixed_now());
        profile.email = Some("old@example.com".into());
        profile
            .onboarding
            .insert("level".into(), Answer::Text("Средний".into()));

        let mut update = ProfileUpdate {
            full_name: Some("Аня".into()),
            ..ProfileUpdate::default()
        };
        update
            .onboarding
            .insert("frequency".into(), Answer::Text("2 раза".into()));

        let later = fixed_now() + chrono::Duration::minutes(1);
        profile.apply(&update, later);

        assert_eq!(profile.email.as_deref(), Some("old@example.com"));
        assert_eq!(profile.full_name.as_deref(), Some("Аня"));
        assert_eq!(profile.onboarding.len(), 2);
        assert_eq!(profile.updated_at, later);
    }

    #[test]
    fn update_skips_empty_fields_when_serialized() {
        let update = ProfileUpdate::default();
        assert_eq!(serde_json::to_value(update).unwrap(), serde_json::json!({}));
    }
}
