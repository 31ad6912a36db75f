#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lesson_progress;
pub mod onboarding;
pub mod plan;
pub mod view;

pub use swim_core::Clock;

pub use app_services::AppServices;
pub use catalog::{CatalogQuery, FacetSelection, filter_lessons};
pub use config::OnboardingConfig;
pub use error::{AppServicesError, OnboardingError, ProgressError};
pub use lesson_progress::{SectionProgressTracker, SectionStep};
pub use onboarding::{Advance, AnswerStore, OnboardingEngine, PendingAdvance, Retreat};
pub use plan::{BadgeState, CompletionFacts, PlanAggregator, PlanLesson, TrainingPlan, WeekBucket};
pub use view::{Screen, ScreenSlot, SlotHandle, ViewError, ViewState};
