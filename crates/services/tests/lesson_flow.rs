mod support;

use std::sync::Arc;

use services::view;
use services::{SectionProgressTracker, SectionStep};
use storage::repository::{LessonRecord, LessonRepository, Storage};
use swim_core::model::{AuthSession, Lesson, LessonSection, SectionKind};
use swim_core::time::fixed_now;
use support::{CountingProgress, lesson_id, session};

fn three_section_lesson() -> Lesson {
    Lesson::new(lesson_id("L1"), "Кроль: работа рук", 40)
        .unwrap()
        .with_sections(vec![
            LessonSection::new("Разминка", SectionKind::Warmup, "300 м свободно"),
            LessonSection::new("Основная часть", SectionKind::Main, "6×50 м на руках"),
            LessonSection::new("Заключение", SectionKind::Cooldown, "100 м на спине"),
        ])
}

#[tokio::test]
async fn stepping_through_every_section_completes_once() {
    let progress = CountingProgress::default();
    let mut tracker =
        SectionProgressTracker::new(&three_section_lesson(), session(), Arc::new(progress.clone()));

    assert_eq!(tracker.advance_or_complete().await, SectionStep::Advanced(1));
    assert_eq!(tracker.advance_or_complete().await, SectionStep::Advanced(2));
    assert_eq!(
        tracker.advance_or_complete().await,
        SectionStep::Completed { persisted: true }
    );
    assert_eq!(tracker.progress_percent(), 100);
    assert_eq!(progress.calls(), 1);

    assert_eq!(tracker.advance_or_complete().await, SectionStep::Disabled);
    assert_eq!(progress.calls(), 1);
}

#[tokio::test]
async fn jumping_to_last_section_completes_everything() {
    let progress = CountingProgress::default();
    let mut tracker =
        SectionProgressTracker::new(&three_section_lesson(), session(), Arc::new(progress.clone()));

    tracker.select_section(2).unwrap();
    tracker.advance_or_complete().await;

    assert!(tracker.sections().iter().all(|s| s.completed));
    assert_eq!(progress.calls(), 1);
    assert_eq!(
        tracker.last_record().map(|r| r.lesson_id.as_str()),
        Some("L1")
    );
}

#[tokio::test]
async fn browsing_back_after_completion_stays_disabled() {
    let progress = CountingProgress::default();
    let mut tracker =
        SectionProgressTracker::new(&three_section_lesson(), session(), Arc::new(progress.clone()));
    tracker.select_section(2).unwrap();
    tracker.advance_or_complete().await;

    tracker.select_section(0).unwrap();
    assert!(!tracker.can_advance());
    assert_eq!(tracker.advance_or_complete().await, SectionStep::Disabled);
    assert_eq!(tracker.active_index(), 0);
    assert_eq!(progress.calls(), 1);
}

#[tokio::test]
async fn failed_completion_keeps_local_state() {
    let progress = CountingProgress::failing();
    let mut tracker =
        SectionProgressTracker::new(&three_section_lesson(), session(), Arc::new(progress.clone()));
    tracker.select_section(2).unwrap();

    assert_eq!(
        tracker.advance_or_complete().await,
        SectionStep::Completed { persisted: false }
    );
    assert!(tracker.is_complete());
    assert_eq!(tracker.progress_percent(), 100);
    assert!(tracker.last_record().is_none());

    assert_eq!(tracker.advance_or_complete().await, SectionStep::Disabled);
    assert_eq!(progress.calls(), 1);
}

#[tokio::test]
async fn partial_progress_rounds_down() {
    let lesson = three_section_lesson().with_sections(vec![
        LessonSection::new("a", SectionKind::Warmup, "").with_completed(true),
        LessonSection::new("b", SectionKind::Main, ""),
        LessonSection::new("c", SectionKind::Cooldown, ""),
    ]);
    let tracker =
        SectionProgressTracker::new(&lesson, session(), Arc::new(CountingProgress::default()));
    assert_eq!(tracker.progress_percent(), 33);
    assert_eq!(lesson.progress(), 33);
}

async fn reload(storage: &Storage, session: &AuthSession) -> Lesson {
    let state =
        view::load_lesson(storage.lessons.as_ref(), storage.progress.as_ref(), session, "L1").await;
    state.ready().cloned().expect("lesson loads")
}

#[tokio::test]
async fn reopened_lesson_reflects_stored_completion() {
    let storage = Storage::in_memory();
    let record = LessonRecord::from_lesson(&three_section_lesson(), fixed_now());
    storage.lessons.upsert_lesson(&record).await.unwrap();
    let session = session();

    let lesson = reload(&storage, &session).await;
    assert_eq!(lesson.progress(), 0);
    let mut tracker =
        SectionProgressTracker::new(&lesson, session.clone(), storage.progress.clone());
    tracker.select_section(2).unwrap();
    assert_eq!(
        tracker.advance_or_complete().await,
        SectionStep::Completed { persisted: true }
    );

    let reopened = reload(&storage, &session).await;
    assert_eq!(reopened.progress(), 100);
    assert!(reopened.sections().iter().all(|s| s.completed));
    let tracker = SectionProgressTracker::new(&reopened, session, storage.progress.clone());
    assert!(!tracker.can_advance());

    // Another user still sees the lesson untouched.
    assert_eq!(reload(&storage, &support::session()).await.progress(), 0);
}
