use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::repository::ProfileRepository;
use swim_core::model::{
    Answer, AuthSession, OnboardingStep, Profile, ProfileUpdate, StepCatalog, StepKind,
};
use swim_core::onboarding::NAME_STEP_ID;

use super::answers::AnswerStore;
use crate::Clock;
use crate::config::OnboardingConfig;
use crate::error::OnboardingError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of moving the wizard forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Now on the step with this index.
    Moved(usize),
    /// The last step was completed. `persisted` is false when the profile
    /// update failed; the wizard is submitted either way.
    Submitted { persisted: bool },
    /// The wizard had already been submitted; nothing happened.
    AlreadySubmitted,
}

/// Result of moving the wizard backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(usize),
    /// Back from the first step: the caller leaves the wizard.
    Exit,
}

/// An auto-advance scheduled by a single-select answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    from_index: usize,
    due_at: DateTime<Utc>,
}

impl PendingAdvance {
    #[must_use]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    #[must_use]
    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one onboarding wizard session from the first step to submission.
///
/// Auto-advance is a pending action with a deadline rather than a timer:
/// hosts call [`OnboardingEngine::tick`] (or `fire_pending` with an explicit
/// instant) and the engine decides whether the advance is due.
pub struct OnboardingEngine {
    catalog: StepCatalog,
    answers: AnswerStore,
    session: AuthSession,
    profiles: Arc<dyn ProfileRepository>,
    clock: Clock,
    config: OnboardingConfig,
    index: usize,
    submitted: bool,
    pending: Option<PendingAdvance>,
    submitted_profile: Option<Profile>,
}

impl OnboardingEngine {
    /// Start a wizard on the first step of `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::EmptyCatalog` when the catalog has no steps.
    pub fn new(
        catalog: StepCatalog,
        session: AuthSession,
        profiles: Arc<dyn ProfileRepository>,
        clock: Clock,
        config: OnboardingConfig,
    ) -> Result<Self, OnboardingError> {
        if catalog.is_empty() {
            return Err(OnboardingError::EmptyCatalog);
        }
        let answers = AnswerStore::new(&catalog);
        Ok(Self {
            catalog,
            answers,
            session,
            profiles,
            clock,
            config,
            index: 0,
            submitted: false,
            pending: None,
            submitted_profile: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&OnboardingStep> {
        if self.submitted {
            return None;
        }
        self.catalog.get(self.index)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn is_selected(&self, step_id: &str, option: &str) -> bool {
        self.answers.is_selected(step_id, option)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn pending_advance(&self) -> Option<PendingAdvance> {
        self.pending
    }

    /// Profile returned by the repository on a successful submission.
    #[must_use]
    pub fn submitted_profile(&self) -> Option<&Profile> {
        self.submitted_profile.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Wizard progress in percent, counting the current step as reached.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.submitted {
            return 100;
        }
        let total = self.catalog.len();
        let reached = (self.index + 1).min(total);
        u8::try_from(reached * 100 / total.max(1)).unwrap_or(100)
    }

    fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.catalog.len()
    }

    fn step(&self, step_id: &str) -> Result<(usize, OnboardingStep), OnboardingError> {
        self.catalog
            .find(step_id)
            .map(|(index, step)| (index, step.clone()))
            .ok_or_else(|| OnboardingError::UnknownStep {
                step_id: step_id.to_owned(),
            })
    }

    //
    // ─── INPUT ─────────────────────────────────────────────────────────────────
    //

    /// Record a choice on a select step.
    ///
    /// Single-select overwrites the answer and, when the step is the current,
    /// non-last step, schedules an auto-advance replacing any pending one.
    /// Multi-select toggles `value` and never auto-advances.
    ///
    /// # Errors
    ///
    /// Returns `Submitted`, `UnknownStep`, `KindMismatch` for free-text steps,
    /// or `InvalidOption` when `value` is not an option of the step.
    pub fn select_option(&mut self, step_id: &str, value: &str) -> Result<(), OnboardingError> {
        if self.submitted {
            return Err(OnboardingError::Submitted);
        }
        let (index, step) = self.step(step_id)?;

        match step.kind() {
            StepKind::SingleSelect => {
                self.answers.select_single(&step, value)?;
                if index == self.index && !self.is_last(index) {
                    let due_at = self.clock.now() + self.config.auto_advance_delay();
                    self.pending = Some(PendingAdvance {
                        from_index: index,
                        due_at,
                    });
                    tracing::debug!(step_id, %due_at, "auto-advance scheduled");
                }
            }
            StepKind::MultiSelect => {
                let selected = self.answers.toggle_choice(&step, value)?;
                tracing::debug!(step_id, value, selected, "choice toggled");
            }
            StepKind::Text | StepKind::Email => {
                return Err(OnboardingError::KindMismatch {
                    step_id: step_id.to_owned(),
                    kind: step.kind(),
                });
            }
        }
        Ok(())
    }

    /// Store free text verbatim on a text or email step.
    ///
    /// # Errors
    ///
    /// Returns `Submitted`, `UnknownStep`, or `KindMismatch` for select steps.
    pub fn set_text(
        &mut self,
        step_id: &str,
        text: impl Into<String>,
    ) -> Result<(), OnboardingError> {
        if self.submitted {
            return Err(OnboardingError::Submitted);
        }
        let (_, step) = self.step(step_id)?;
        self.answers.set_text(&step, text.into())
    }

    /// Whether the current step's answer allows moving forward.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.current_step()
            .is_some_and(|step| self.answers.satisfies(step))
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next step, submitting on the last one.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Validation` when the current answer does not
    /// satisfy the step.
    pub async fn advance(&mut self) -> Result<Advance, OnboardingError> {
        if self.submitted {
            return Ok(Advance::AlreadySubmitted);
        }
        if !self.can_advance() {
            return Err(OnboardingError::Validation {
                step_id: self.current_step_id(),
            });
        }
        Ok(self.move_forward().await)
    }

    /// Move forward past an optional step without checking its answer.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::NotOptional` when the current step is required.
    pub async fn skip(&mut self) -> Result<Advance, OnboardingError> {
        if self.submitted {
            return Ok(Advance::AlreadySubmitted);
        }
        if !self.current_step().is_some_and(OnboardingStep::is_optional) {
            return Err(OnboardingError::NotOptional {
                step_id: self.current_step_id(),
            });
        }
        Ok(self.move_forward().await)
    }

    /// Move back one step, cancelling any pending auto-advance.
    pub fn retreat(&mut self) -> Retreat {
        self.pending = None;
        if self.submitted || self.index == 0 {
            return Retreat::Exit;
        }
        self.index -= 1;
        tracing::debug!(index = self.index, "onboarding step back");
        Retreat::Moved(self.index)
    }

    /// Fire the pending auto-advance if it is due at `now`.
    ///
    /// A pending advance scheduled on a step the wizard has since left is
    /// dropped. Returns `None` when nothing fired.
    pub async fn fire_pending(&mut self, now: DateTime<Utc>) -> Option<Advance> {
        let pending = self.pending?;
        if pending.due_at > now {
            return None;
        }
        self.pending = None;
        if self.submitted || pending.from_index != self.index {
            tracing::debug!(from_index = pending.from_index, "dropping stale auto-advance");
            return None;
        }
        Some(self.move_forward().await)
    }

    /// Fire the pending auto-advance against the engine's clock.
    pub async fn tick(&mut self) -> Option<Advance> {
        let now = self.clock.now();
        self.fire_pending(now).await
    }

    fn current_step_id(&self) -> String {
        self.current_step()
            .map(|step| step.id().to_owned())
            .unwrap_or_default()
    }

    async fn move_forward(&mut self) -> Advance {
        self.pending = None;
        if !self.is_last(self.index) {
            self.index += 1;
            tracing::debug!(index = self.index, "onboarding step forward");
            return Advance::Moved(self.index);
        }
        self.submit().await
    }

    async fn submit(&mut self) -> Advance {
        let update = self.build_update();
        self.submitted = true;

        let user_id = self.session.user_id();
        match self.profiles.update(&self.session, &update).await {
            Ok(profile) => {
                tracing::info!(%user_id, answers = update.onboarding.len(), "onboarding submitted");
                self.submitted_profile = Some(profile);
                Advance::Submitted { persisted: true }
            }
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "failed to save onboarding answers");
                Advance::Submitted { persisted: false }
            }
        }
    }

    fn build_update(&self) -> ProfileUpdate {
        let full_name = self
            .answers
            .get(NAME_STEP_ID)
            .and_then(Answer::as_text)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        ProfileUpdate {
            email: self.session.email().map(str::to_owned),
            full_name,
            onboarding: self.answers.as_map().clone(),
        }
    }
}
