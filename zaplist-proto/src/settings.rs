//! Application settings record.
//!
//! Settings are a single record rather than a collection. Every field has a
//! hard-coded default, and a persisted record only needs to carry the
//! fields it overrides.

use serde::{Deserialize, Serialize};

/// Appearance preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the system appearance.
    #[default]
    System,
}

impl Theme {
    /// The theme a quick toggle switches to: light becomes dark, anything
    /// else becomes light.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark | Self::System => Self::Light,
        }
    }

    /// Whether the effective appearance is dark.
    #[must_use]
    pub const fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => system_prefers_dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Error returned when a theme name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}` (expected light, dark, or system)")]
pub struct ParseThemeError(String);

impl std::str::FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// Default UI language.
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// The persisted preference record.
///
/// Deserializing fills any missing field from [`AppSettings::default`], so a
/// partial record on disk merges over the defaults with persisted fields
/// winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Appearance preference.
    pub theme: Theme,
    /// Whether reminders are enabled.
    pub notifications: bool,
    /// Whether forms save without an explicit confirm.
    pub auto_save: bool,
    /// UI language tag.
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications: true,
            auto_save: true,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppSettings {
    /// Returns a copy with `patch` shallow-merged over this record.
    #[must_use]
    pub fn merged(&self, patch: SettingsPatch) -> Self {
        Self {
            theme: patch.theme.unwrap_or(self.theme),
            notifications: patch.notifications.unwrap_or(self.notifications),
            auto_save: patch.auto_save.unwrap_or(self.auto_save),
            language: patch.language.unwrap_or_else(|| self.language.clone()),
        }
    }
}

/// A partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    /// New theme.
    pub theme: Option<Theme>,
    /// New notifications flag.
    pub notifications: Option<bool>,
    /// New auto-save flag.
    pub auto_save: Option<bool>,
    /// New language tag.
    pub language: Option<String>,
}

impl SettingsPatch {
    /// A patch that only changes the theme.
    #[must_use]
    pub const fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            notifications: None,
            auto_save: None,
            language: None,
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.notifications.is_none()
            && self.auto_save.is_none()
            && self.language.is_none()
    }
}
