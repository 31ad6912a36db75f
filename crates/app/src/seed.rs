//! Sample curriculum for a fresh database.

use chrono::{DateTime, Duration, Utc};
use storage::repository::LessonRecord;
use swim_core::model::week::week_title_and_description;
use swim_core::model::{Facets, Lesson, LessonId, LessonSection, PlanPlacement, SectionKind};

const LESSONS_PER_WEEK: u32 = 3;

const STYLES: [&str; 4] = ["Кроль", "Спина", "Брасс", "Дельфин"];
const TRAINING_TYPES: [&str; 5] = ["Техника", "Дыхание", "Выносливость", "Скорость", "Повороты"];

fn level_for(week: u32) -> &'static str {
    match week {
        0..=3 => "Начинающий",
        4..=6 => "Средний",
        _ => "Продвинутый",
    }
}

fn sections(focus: &str, minutes: u32) -> Vec<LessonSection> {
    vec![
        LessonSection::new(
            "Разминка",
            SectionKind::Warmup,
            "200 м спокойного плавания любым способом, 4×25 м на технику.",
        ),
        LessonSection::new(
            focus,
            SectionKind::Main,
            format!(
                "Основное задание на {} минут с отдыхом 20–30 секунд между отрезками.",
                minutes.saturating_sub(10)
            ),
        ),
        LessonSection::new(
            "Заминка",
            SectionKind::Cooldown,
            "100 м медленно на спине, растяжка на бортике.",
        ),
    ]
}

/// Build `weeks` weeks of lessons. Only the very first lesson is unlocked.
///
/// # Errors
///
/// Returns `swim_core::Error` if a generated lesson fails validation.
pub fn sample_curriculum(
    weeks: u32,
    created_at: DateTime<Utc>,
) -> Result<Vec<LessonRecord>, swim_core::Error> {
    let mut records = Vec::new();
    let mut offset = 0_i64;
    let mut seq = 0_usize;

    for week in 1..=weeks {
        let (week_title, week_description) = week_title_and_description(week);
        for n in 0..LESSONS_PER_WEEK {
            let style = STYLES[seq % STYLES.len()];
            let training_type = TRAINING_TYPES[seq % TRAINING_TYPES.len()];
            let minutes = 30 + 5 * (week.min(6));
            let title = format!("{week_title}: занятие {}", n + 1);

            let description =
                format!("{week_description}. Акцент: {}.", training_type.to_lowercase());

            let lesson = Lesson::new(LessonId::new(format!("w{week}-l{}", n + 1))?, title, minutes)?
                .with_description(Some(description))
                .with_facets(Facets::from_optional(
                    Some(style.to_owned()),
                    Some(training_type.to_owned()),
                    Some(level_for(week).to_owned()),
                ))
                .with_sections(sections(training_type, minutes))
                .with_placement(PlanPlacement::new(Some(week), i32::try_from(n).ok()))
                .with_flags(Some(week != 1 || n != 0), None);

            records.push(LessonRecord::from_lesson(
                &lesson,
                created_at + Duration::seconds(offset),
            ));
            offset += 1;
            seq += 1;
        }
    }

    Ok(records)
}
