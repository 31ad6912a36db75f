//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use swim_core::model::{StepError, StepKind};

/// Errors emitted by `OnboardingEngine`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum OnboardingError {
    #[error("step `{step_id}` needs an answer before moving on")]
    Validation { step_id: String },
    #[error("step `{step_id}` cannot be skipped")]
    NotOptional { step_id: String },
    #[error("unknown step `{step_id}`")]
    UnknownStep { step_id: String },
    #[error("`{value}` is not an option of step `{step_id}`")]
    InvalidOption { step_id: String, value: String },
    #[error("step `{step_id}` is a {kind:?} step")]
    KindMismatch { step_id: String, kind: StepKind },
    #[error("onboarding already submitted")]
    Submitted,
    #[error("onboarding has no steps")]
    EmptyCatalog,
}

/// Errors emitted by `SectionProgressTracker`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("section {index} is out of range (lesson has {len})")]
    SectionOutOfRange { index: usize, len: usize },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] StepError),
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),
    #[error("no user is signed in")]
    NotSignedIn,
}
