/// Title and description shown for a plan week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekInfo {
    pub title: &'static str,
    pub description: &'static str,
}

const WEEKS: [WeekInfo; 8] = [
    WeekInfo {
        title: "Знакомство с водой",
        description: "Базовые упражнения для освоения в воде",
    },
    WeekInfo {
        title: "Скольжение в воде",
        description: "Учимся правильно скользить и работать ногами",
    },
    WeekInfo {
        title: "Работа ног",
        description: "Совершенствуем технику работы ног",
    },
    WeekInfo {
        title: "Работа рук",
        description: "Изучаем технику работы рук",
    },
    WeekInfo {
        title: "Координация движений",
        description: "Соединяем работу рук и ног",
    },
    WeekInfo {
        title: "Дыхание в кроле",
        description: "Совершенствуем технику дыхания",
    },
    WeekInfo {
        title: "Повороты и старты",
        description: "Изучаем технику поворотов и стартов",
    },
    WeekInfo {
        title: "Закрепление навыков",
        description: "Финальное закрепление всех элементов",
    },
];

/// Placeholder for weeks outside the static table.
pub const UNKNOWN_WEEK_DESCRIPTION: &str = "Описание недели отсутствует.";

/// Number of weeks with predefined metadata.
pub const PREDEFINED_WEEKS: u32 = 8;

/// Static metadata for weeks 1..=8.
#[must_use]
pub fn week_info(week: u32) -> Option<WeekInfo> {
    let index = usize::try_from(week.checked_sub(1)?).ok()?;
    WEEKS.get(index).copied()
}

/// Title and description for any week, with a generic fallback.
#[must_use]
pub fn week_title_and_description(week: u32) -> (String, String) {
    match week_info(week) {
        Some(info) => (info.title.to_owned(), info.description.to_owned()),
        None => (
            format!("Неделя {week}"),
            UNKNOWN_WEEK_DESCRIPTION.to_owned(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_weeks_one_to_eight() {
        for week in 1..=PREDEFINED_WEEKS {
            assert!(week_info(week).is_some(), "week {week}");
        }
        assert!(week_info(0).is_none());
        assert!(week_info(9).is_none());
    }

    #[test]
    fn unknown_week_gets_generic_label() {
        let (title, description) = week_title_and_description(12);
        assert_eq!(title, "Неделя 12");
        assert_eq!(description, UNKNOWN_WEEK_DESCRIPTION);

        let (title, _) = week_title_and_description(1);
        assert_eq!(title, "Знакомство с водой");
    }
}
