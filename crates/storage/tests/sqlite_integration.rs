use chrono::Duration;
use storage::repository::{
    LessonProgressRepository, LessonRecord, LessonRepository, ProfileRepository, SectionRecord,
    StorageError,
};
use storage::sqlite::SqliteRepository;
use swim_core::model::{Answer, AuthSession, LessonId, ProfileUpdate, SectionKind, UserId};
use swim_core::time::{fixed_clock, fixed_now};

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url)
        .await
        .expect("connect")
        .with_clock(fixed_clock());
    repo.migrate().await.expect("migrate");
    repo
}

fn session() -> AuthSession {
    AuthSession::new(UserId::random(), Some("swimmer@example.com".into()), fixed_now())
}

fn lesson_id(raw: &str) -> LessonId {
    LessonId::new(raw).unwrap()
}

#[tokio::test]
async fn sqlite_lesson_roundtrip_keeps_sections_and_defaults() {
    let repo = connect("memdb_lessons").await;

    let mut record = LessonRecord::new("L1", "Скольжение на груди", 30, fixed_now());
    record.style = Some("Кроль".into());
    record.week = Some(2);
    record.order_in_week = Some(1);
    record.sections = Some(vec![
        SectionRecord {
            title: Some("Разминка".into()),
            kind: Some("warmup".into()),
            content: Some("200 м".into()),
            ..SectionRecord::default()
        },
        SectionRecord::default(),
    ]);
    repo.upsert_lesson(&record).await.unwrap();
    repo.upsert_lesson(&LessonRecord::new(
        "L0",
        "Первое знакомство",
        15,
        fixed_now() - Duration::days(1),
    ))
    .await
    .unwrap();

    let lessons = LessonRepository::list(&repo).await.unwrap();
    let ids: Vec<_> = lessons.iter().map(|l| l.id().to_string()).collect();
    assert_eq!(ids, vec!["L0", "L1"]);

    let lesson = LessonRepository::get(&repo, &lesson_id("L1")).await.unwrap();
    assert_eq!(lesson.style(), "Кроль");
    assert_eq!(lesson.level(), "Начинающий");
    assert_eq!(lesson.placement().week(), 2);
    assert_eq!(lesson.sections().len(), 2);
    assert_eq!(lesson.sections()[0].kind, SectionKind::Warmup);
    assert_eq!(lesson.sections()[1].kind, SectionKind::Main);
    assert_eq!(lesson.sections()[1].title, "Без названия");

    let err = LessonRepository::get(&repo, &lesson_id("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_upsert_replaces_existing_lesson() {
    let repo = connect("memdb_upsert").await;

    let mut record = LessonRecord::new("L1", "Старое название", 30, fixed_now());
    repo.upsert_lesson(&record).await.unwrap();
    record.title = "Новое название".into();
    record.level = Some("Средний".into());
    repo.upsert_lesson(&record).await.unwrap();

    let lessons = LessonRepository::list(&repo).await.unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].title(), "Новое название");
    assert_eq!(lessons[0].level(), "Средний");
}

#[tokio::test]
async fn sqlite_progress_complete_is_an_upsert() {
    let repo = connect("memdb_progress").await;
    repo.upsert_lesson(&LessonRecord::new("L1", "Урок", 30, fixed_now()))
        .await
        .unwrap();
    let session = session();

    let first = repo.complete(&session, &lesson_id("L1")).await.unwrap();
    assert!(first.completed);
    assert_eq!(first.completed_at, Some(fixed_now()));

    let second = repo.complete(&session, &lesson_id("L1")).await.unwrap();
    assert_eq!(first, second);

    let records = LessonProgressRepository::list(&repo, &session).await.unwrap();
    assert_eq!(records.len(), 1);

    let other = AuthSession::new(UserId::random(), None, fixed_now());
    assert!(LessonProgressRepository::list(&repo, &other)
        .await
        .unwrap()
        .is_empty());

    let err = repo
        .complete(&session, &lesson_id("unknown"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_profile_update_merges_answers() {
    let repo = connect("memdb_profiles").await;
    let session = session();
    assert!(ProfileRepository::get(&repo, &session).await.unwrap().is_none());

    let mut update = ProfileUpdate {
        email: session.email().map(str::to_owned),
        full_name: Some("Аня".into()),
        ..ProfileUpdate::default()
    };
    update
        .onboarding
        .insert("level".into(), Answer::Text("Плаваю несколько бассейнов по 25 м".into()));
    repo.update(&session, &update).await.unwrap();

    let mut second = ProfileUpdate::default();
    second.onboarding.insert(
        "goals".into(),
        Answer::Choices(["Улучшить технику".to_owned()].into_iter().collect()),
    );
    repo.update(&session, &second).await.unwrap();

    let profile = ProfileRepository::get(&repo, &session)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Аня"));
    assert_eq!(profile.email.as_deref(), Some("swimmer@example.com"));
    assert_eq!(profile.onboarding.len(), 2);
    assert!(profile.onboarding["goals"].as_choices().is_some());
}

#[tokio::test]
async fn sqlite_list_tolerates_malformed_rows() {
    let repo = connect("memdb_malformed").await;
    repo.upsert_lesson(&LessonRecord::new("good", "Скольжение", 30, fixed_now()))
        .await
        .unwrap();

    let rows = [
        ("odd", "Секции объектом", 25_i64, Some(r#"{"not":"array"}"#)),
        ("zero", "Нулевая длительность", 0, None),
        ("blank", "  ", 20, None),
    ];
    for (offset, (id, title, duration, sections)) in (1_i64..).zip(rows) {
        sqlx::query(
            "INSERT INTO lessons (id, title, duration, sections, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(title)
        .bind(duration)
        .bind(sections)
        .bind(fixed_now() + Duration::seconds(offset))
        .execute(repo.pool())
        .await
        .unwrap();
    }

    let lessons = LessonRepository::list(&repo).await.unwrap();
    let ids: Vec<_> = lessons.iter().map(|l| l.id().to_string()).collect();
    assert_eq!(ids, vec!["good", "odd"]);
    assert!(lessons[1].sections().is_empty());

    let odd = LessonRepository::get(&repo, &lesson_id("odd")).await.unwrap();
    assert_eq!(odd.progress(), 0);
}
