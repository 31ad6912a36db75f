use serde::{Deserialize, Serialize};
use url::Url;

/// Which part of a lesson a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Warmup,
    #[default]
    Main,
    Cooldown,
}

impl SectionKind {
    /// Parses the remote `type` tag; unknown tags yield `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "warmup" => Some(Self::Warmup),
            "main" => Some(Self::Main),
            "cooldown" => Some(Self::Cooldown),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Main => "main",
            Self::Cooldown => "cooldown",
        }
    }

    /// Localized heading shown above the section.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Warmup => "Разминка",
            Self::Main => "Основная часть",
            Self::Cooldown => "Заключение",
        }
    }
}

/// One ordered part of a lesson. Order defines sequential unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub title: String,
    pub kind: SectionKind,
    pub content: String,
    pub image: Option<Url>,
    pub completed: bool,
}

impl LessonSection {
    /// Title used when the remote section has none.
    pub const UNTITLED: &'static str = "Без названия";

    #[must_use]
    pub fn new(title: impl Into<String>, kind: SectionKind, content: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            Self::UNTITLED.to_owned()
        } else {
            title
        };
        Self {
            title,
            kind,
            content: content.into(),
            image: None,
            completed: false,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<Url>) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Integer completion ratio of a section list, 0 when there are no sections.
#[must_use]
pub fn completion_percent(sections: &[LessonSection]) -> u8 {
    if sections.is_empty() {
        return 0;
    }
    let done = sections.iter().filter(|s| s.completed).count();
    let percent = done * 100 / sections.len();
    u8::try_from(percent).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip() {
        for kind in [SectionKind::Warmup, SectionKind::Main, SectionKind::Cooldown] {
            assert_eq!(SectionKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(SectionKind::from_tag(" WarmUp "), Some(SectionKind::Warmup));
        assert_eq!(SectionKind::from_tag("stretch"), None);
    }

    #[test]
    fn blank_title_falls_back() {
        let section = LessonSection::new("  ", SectionKind::Main, "");
        assert_eq!(section.title, LessonSection::UNTITLED);
    }

    #[test]
    fn completion_percent_floors() {
        let sections = vec![
            LessonSection::new("a", SectionKind::Warmup, "").with_completed(true),
            LessonSection::new("b", SectionKind::Main, ""),
            LessonSection::new("c", SectionKind::Cooldown, ""),
        ];
        assert_eq!(completion_percent(&sections), 33);
        assert_eq!(completion_percent(&[]), 0);
    }
}
