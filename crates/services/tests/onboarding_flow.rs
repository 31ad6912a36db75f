mod support;

use std::sync::Arc;

use services::{Advance, Clock, OnboardingConfig, OnboardingEngine, OnboardingError, Retreat};
use storage::repository::{InMemoryRepository, ProfileRepository};
use swim_core::model::{Answer, StepKind};
use swim_core::onboarding::default_catalog;
use swim_core::time::{fixed_clock, fixed_now};
use support::{FailingRepository, session};

fn engine_with(profiles: Arc<dyn ProfileRepository>, config: OnboardingConfig) -> OnboardingEngine {
    OnboardingEngine::new(default_catalog().unwrap(), session(), profiles, fixed_clock(), config)
        .unwrap()
}

/// Answers the required steps, letting single-selects auto-advance.
async fn complete_required_steps(engine: &mut OnboardingEngine) {
    engine.set_text("name", "Аня").unwrap();
    assert_eq!(engine.advance().await.unwrap(), Advance::Moved(1));

    engine.select_option("goals", "Повысить выносливость").unwrap();
    assert_eq!(engine.advance().await.unwrap(), Advance::Moved(2));

    engine
        .select_option("level", "Проплываю свыше 500 м за тренировку")
        .unwrap();
    assert_eq!(engine.tick().await, Some(Advance::Moved(3)));

    engine.select_option("frequency", "3 раза").unwrap();
    assert_eq!(engine.tick().await, Some(Advance::Moved(4)));

    engine.select_option("equipment", "Колобашка").unwrap();
    engine.select_option("equipment", "Лопатки").unwrap();
    assert_eq!(engine.tick().await, None);
    assert_eq!(engine.advance().await.unwrap(), Advance::Moved(5));
}

#[tokio::test]
async fn full_wizard_persists_profile_update() {
    let repo = InMemoryRepository::new().with_clock(fixed_clock());
    let mut engine = engine_with(Arc::new(repo.clone()), OnboardingConfig::immediate());

    complete_required_steps(&mut engine).await;
    engine.select_option("watch", "Garmin").unwrap();
    assert!(engine.pending_advance().is_none(), "last step never auto-advances");
    assert_eq!(
        engine.advance().await.unwrap(),
        Advance::Submitted { persisted: true }
    );
    assert_eq!(engine.advance().await.unwrap(), Advance::AlreadySubmitted);

    let profile = repo.get(engine.session()).await.unwrap().unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Аня"));
    assert_eq!(
        profile.onboarding.get("watch"),
        Some(&Answer::Text("Garmin".into()))
    );
    let equipment = profile.onboarding["equipment"].as_choices().unwrap();
    assert_eq!(equipment.len(), 2);
}

#[tokio::test]
async fn repository_failure_still_submits() {
    let mut engine = engine_with(Arc::new(FailingRepository), OnboardingConfig::immediate());
    complete_required_steps(&mut engine).await;

    assert_eq!(
        engine.skip().await.unwrap(),
        Advance::Submitted { persisted: false }
    );
    assert!(engine.is_submitted());
    assert!(engine.submitted_profile().is_none());
    assert_eq!(engine.retreat(), Retreat::Exit);
    assert_eq!(
        engine.select_option("watch", "Garmin"),
        Err(OnboardingError::Submitted)
    );
}

#[tokio::test]
async fn toggling_any_multi_select_option_twice_is_an_involution() {
    let catalog = default_catalog().unwrap();
    let mut engine = engine_with(
        Arc::new(InMemoryRepository::new()),
        OnboardingConfig::default(),
    );

    for step in catalog.steps().iter().filter(|s| s.kind() == StepKind::MultiSelect) {
        engine.select_option(step.id(), &step.options()[0]).unwrap();
        for option in step.options() {
            let before = engine.answers().get(step.id()).cloned();
            engine.select_option(step.id(), option).unwrap();
            engine.select_option(step.id(), option).unwrap();
            assert_eq!(engine.answers().get(step.id()).cloned(), before);
        }
    }
}

#[tokio::test]
async fn whitespace_only_text_never_advances() {
    let mut engine = engine_with(
        Arc::new(InMemoryRepository::new()),
        OnboardingConfig::immediate(),
    );
    for text in ["", " ", "\t\n", "   \u{3000}"] {
        engine.set_text("name", text).unwrap();
        assert!(!engine.can_advance(), "{text:?} must not pass");
    }
    assert!(matches!(
        engine.advance().await,
        Err(OnboardingError::Validation { .. })
    ));
}

#[tokio::test]
async fn stale_auto_advance_is_dropped_after_manual_navigation() {
    let mut engine = OnboardingEngine::new(
        default_catalog().unwrap(),
        session(),
        Arc::new(InMemoryRepository::new()),
        Clock::fixed(fixed_now()),
        OnboardingConfig::default(),
    )
    .unwrap();
    engine.set_text("name", "Аня").unwrap();
    engine.advance().await.unwrap();
    engine.select_option("goals", "Улучшить технику").unwrap();
    engine.advance().await.unwrap();

    engine
        .select_option("level", "Могу проплыть только 25–50 м, делаю паузы")
        .unwrap();
    let due = engine.pending_advance().unwrap().due_at();
    assert_eq!(engine.advance().await.unwrap(), Advance::Moved(3));
    assert_eq!(engine.fire_pending(due).await, None);
    assert_eq!(engine.current_index(), 3);
}
