use serde::{Deserialize, Serialize};

/// Store key holding the theme preference.
pub const THEME_KEY: &str = "theme";
/// Store key holding the haptics preference.
pub const HAPTICS_KEY: &str = "haptics";

/// User preferences persisted in the key-value store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub haptics_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            haptics_enabled: true,
        }
    }
}

impl AppSettings {
    /// Builds settings from raw stored values, applying the defaults for
    /// absent or unknown values.
    pub fn from_stored(theme: Option<&str>, haptics: Option<&str>) -> Self {
        Self {
            theme: theme.and_then(ThemeMode::parse).unwrap_or(ThemeMode::Light),
            haptics_enabled: haptics != Some("false"),
        }
    }
}

/// Color theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}
