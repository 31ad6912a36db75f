use chrono::{DateTime, Utc};

use crate::model::ids::UserId;

/// Authenticated identity passed explicitly to user-keyed operations.
///
/// Created when the user signs in and dropped on sign-out; there is no
/// process-wide session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    user_id: UserId,
    email: Option<String>,
    started_at: DateTime<Utc>,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>, started_at: DateTime<Utc>) -> Self {
        let email = email
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());
        Self {
            user_id,
            email,
            started_at,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn blank_email_is_dropped() {
        let session = AuthSession::new(UserId::random(), Some("  ".into()), fixed_now());
        assert_eq!(session.email(), None);
    }
}
