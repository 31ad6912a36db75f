use serde::{Deserialize, Serialize};

/// Classification axis used to tag and filter lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Style,
    TrainingType,
    Level,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Style, Facet::TrainingType, Facet::Level];

    /// Section heading for the filter panel.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Facet::Style => "Стиль плавания",
            Facet::TrainingType => "Тип тренировки",
            Facet::Level => "Уровень",
        }
    }

    /// Selectable options for this axis, in display order.
    #[must_use]
    pub fn options(self) -> &'static [FacetOption] {
        match self {
            Facet::Style => SWIMMING_STYLES,
            Facet::TrainingType => TRAINING_TYPES,
            Facet::Level => LEVELS,
        }
    }
}

/// A selectable filter chip. `label` is what gets matched against lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetOption {
    pub id: &'static str,
    pub label: &'static str,
    pub facet: Facet,
}

const fn option(id: &'static str, label: &'static str, facet: Facet) -> FacetOption {
    FacetOption { id, label, facet }
}

pub const SWIMMING_STYLES: &[FacetOption] = &[
    option("freestyle", "Кроль", Facet::Style),
    option("backstroke", "Спина", Facet::Style),
    option("breaststroke", "Брасс", Facet::Style),
    option("butterfly", "Дельфин", Facet::Style),
];

pub const TRAINING_TYPES: &[FacetOption] = &[
    option("endurance", "Выносливость", Facet::TrainingType),
    option("technique", "Техника", Facet::TrainingType),
    option("speed", "Скорость", Facet::TrainingType),
    option("breathing", "Дыхание", Facet::TrainingType),
    option("turns", "Повороты", Facet::TrainingType),
];

pub const LEVELS: &[FacetOption] = &[
    option("beginner", "Начинающий", Facet::Level),
    option("intermediate", "Средний", Facet::Level),
    option("advanced", "Продвинутый", Facet::Level),
];

/// Looks up a filter option by its stable id.
#[must_use]
pub fn find_option(id: &str) -> Option<&'static FacetOption> {
    Facet::ALL
        .iter()
        .flat_map(|facet| facet.options().iter())
        .find(|opt| opt.id == id)
}

/// The three facet values of a lesson, always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub style: String,
    pub training_type: String,
    pub level: String,
}

impl Facets {
    pub const DEFAULT_STYLE: &'static str = "Техника";
    pub const DEFAULT_TRAINING_TYPE: &'static str = "Дыхание";
    pub const DEFAULT_LEVEL: &'static str = "Начинающий";

    /// Builds facets, substituting the fallback for each missing or blank value.
    #[must_use]
    pub fn from_optional(
        style: Option<String>,
        training_type: Option<String>,
        level: Option<String>,
    ) -> Self {
        fn or_default(value: Option<String>, fallback: &str) -> String {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_owned())
        }

        Self {
            style: or_default(style, Self::DEFAULT_STYLE),
            training_type: or_default(training_type, Self::DEFAULT_TRAINING_TYPE),
            level: or_default(level, Self::DEFAULT_LEVEL),
        }
    }

    #[must_use]
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::Style => &self.style,
            Facet::TrainingType => &self.training_type,
            Facet::Level => &self.level,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        Facet::ALL.into_iter().map(|facet| self.get(facet))
    }
}

impl Default for Facets {
    fn default() -> Self {
        Self::from_optional(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_facets_use_fallbacks() {
        let facets = Facets::from_optional(Some("Кроль".into()), Some("  ".into()), None);
        assert_eq!(facets.style, "Кроль");
        assert_eq!(facets.training_type, Facets::DEFAULT_TRAINING_TYPE);
        assert_eq!(facets.level, Facets::DEFAULT_LEVEL);
    }

    #[test]
    fn missing_style_defaults_to_technique() {
        assert_eq!(Facets::default().style, "Техника");
        assert_eq!(Facets::from_optional(None, None, None).values().next(), Some("Техника"));
    }

    #[test]
    fn option_lookup_by_id() {
        let opt = find_option("breaststroke").unwrap();
        assert_eq!(opt.label, "Брасс");
        assert_eq!(opt.facet, Facet::Style);
        assert!(find_option("unknown").is_none());
    }

    #[test]
    fn every_axis_has_options() {
        for facet in Facet::ALL {
            assert!(!facet.options().is_empty());
            assert!(facet.options().iter().all(|o| o.facet == facet));
        }
    }
}
