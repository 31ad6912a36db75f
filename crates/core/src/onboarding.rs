//! The onboarding questionnaire shipped with the app.

use crate::model::{OnboardingStep, StepCatalog, StepError, StepKind};

/// Step whose text answer doubles as the profile's full name.
pub const NAME_STEP_ID: &str = "name";

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// Builds the default six-step questionnaire.
///
/// # Errors
///
/// Returns `StepError` only if the static definitions are inconsistent.
pub fn default_catalog() -> Result<StepCatalog, StepError> {
    StepCatalog::new(vec![
        OnboardingStep::new(NAME_STEP_ID, "Как вас зовут?", StepKind::Text, Vec::new())?
            .with_description("Это поможет нам персонализировать ваш опыт"),
        OnboardingStep::new(
            "goals",
            "Зачем вы хотите заниматься плаванием?",
            StepKind::MultiSelect,
            options(&[
                "Хочу научиться плавать",
                "Для здоровья и общего самочувствия",
                "Улучшить технику",
                "Повысить выносливость",
                "Готовлюсь к соревнованиям / заплыву",
                "Просто для удовольствия",
            ]),
        )?
        .with_description("Можно выбрать несколько вариантов"),
        OnboardingStep::new(
            "level",
            "Какой у вас уровень плавания?",
            StepKind::SingleSelect,
            options(&[
                "Могу проплыть только 25–50 м, делаю паузы",
                "Плаваю несколько бассейнов по 25 м",
                "Проплываю свыше 500 м за тренировку",
                "Проплываю больше 1 км за тренировку",
            ]),
        )?
        .with_description("Это поможет нам подобрать подходящую программу"),
        OnboardingStep::new(
            "frequency",
            "Сколько раз в неделю вы планируете тренироваться?",
            StepKind::SingleSelect,
            options(&["1 раз", "2 раза", "3 раза", "4 раза", "5+ раз"]),
        )?
        .with_description("Мы составим оптимальный график тренировок"),
        OnboardingStep::new(
            "equipment",
            "Какое оборудование у вас есть?",
            StepKind::MultiSelect,
            options(&[
                "Ласты",
                "Доска",
                "Колобашка",
                "Лопатки",
                "Трубка",
                "Ничего из этого",
            ]),
        )?
        .with_description("Выберите всё, что у вас есть"),
        OnboardingStep::new(
            "watch",
            "Хотите подключить часы для трекинга?",
            StepKind::SingleSelect,
            options(&["Apple Watch", "Garmin", "Другое", "Нет / подключу позже"]),
        )?
        .with_description("Это поможет точнее отслеживать ваш прогресс")
        .optional(),
    ])
}
