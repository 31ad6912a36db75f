//! Runtime knobs for the engines.

use chrono::Duration;

/// Environment variable overriding the auto-advance delay, in milliseconds.
pub const AUTO_ADVANCE_ENV: &str = "SWIM_AUTO_ADVANCE_MS";

/// Onboarding wizard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingConfig {
    auto_advance_delay: Duration,
}

impl OnboardingConfig {
    pub const DEFAULT_AUTO_ADVANCE_MS: i64 = 300;

    #[must_use]
    pub fn new(auto_advance_delay: Duration) -> Self {
        Self {
            auto_advance_delay: auto_advance_delay.max(Duration::zero()),
        }
    }

    /// Auto-advance fires on the next tick.
    #[must_use]
    pub fn immediate() -> Self {
        Self::new(Duration::zero())
    }

    /// Reads `SWIM_AUTO_ADVANCE_MS`; missing or unparsable values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(AUTO_ADVANCE_ENV).ok().as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw.map(str::trim).map(str::parse::<u32>) {
            Some(Ok(ms)) => Self::new(Duration::milliseconds(i64::from(ms))),
            Some(Err(err)) => {
                tracing::warn!(
                    var = AUTO_ADVANCE_ENV,
                    error = %err,
                    "ignoring invalid auto-advance delay"
                );
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self::new(Duration::milliseconds(Self::DEFAULT_AUTO_ADVANCE_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_300ms() {
        assert_eq!(
            OnboardingConfig::default().auto_advance_delay(),
            Duration::milliseconds(300)
        );
    }

    #[test]
    fn env_value_parsing() {
        assert_eq!(
            OnboardingConfig::from_env_value(Some(" 0 ")),
            OnboardingConfig::immediate()
        );
        assert_eq!(
            OnboardingConfig::from_env_value(Some("fast")),
            OnboardingConfig::default()
        );
        assert_eq!(
            OnboardingConfig::from_env_value(None),
            OnboardingConfig::default()
        );
    }
}
