//! Onboarding wizard: answer storage and step sequencing.

pub mod answers;
pub mod engine;

pub use answers::AnswerStore;
pub use engine::{Advance, OnboardingEngine, PendingAdvance, Retreat};
