//! Theme Engine — light/dark palettes and the colors used to draw QR symbols.

use serde::Serialize;

use crate::types::settings::ThemeMode;

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    fn set_theme(&mut self, mode: ThemeMode);
    fn get_theme(&self) -> ThemeMode;
    fn colors(&self) -> &'static ThemeColors;
    fn qr_colors(&self) -> QrColors;
}

/// Status bar content style.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarStyle {
    Light,
    Dark,
}

/// Palette for one theme.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThemeColors {
    pub background: &'static str,
    pub card: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub primary: &'static str,
    pub primary_text: &'static str,
    pub shadow: &'static str,
    pub shadow_opacity: f32,
    pub icon: &'static str,
    pub status_bar: StatusBarStyle,
}

pub const LIGHT: ThemeColors = ThemeColors {
    background: "#FDFDFF",
    card: "#FFFFFF",
    border: "#E5E7EB",
    text: "#1E1B4B",
    subtext: "#6B7280",
    primary: "#6366F1",
    primary_text: "#FFFFFF",
    shadow: "#000000",
    shadow_opacity: 0.05,
    icon: "#6366F1",
    status_bar: StatusBarStyle::Dark,
};

pub const DARK: ThemeColors = ThemeColors {
    background: "#0F172A",
    card: "#1E293B",
    border: "#334155",
    text: "#F8FAFC",
    subtext: "#94A3B8",
    primary: "#818CF8",
    primary_text: "#0F172A",
    shadow: "#000000",
    shadow_opacity: 0.25,
    icon: "#FFFFFF",
    status_bar: StatusBarStyle::Light,
};

/// Foreground/background of a rendered QR symbol.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QrColors {
    pub foreground: &'static str,
    pub background: &'static str,
}

/// The theme engine implementation.
pub struct ThemeEngine {
    current_theme: ThemeMode,
}

impl ThemeEngine {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            current_theme: mode,
        }
    }
}

impl ThemeEngineTrait for ThemeEngine {
    fn set_theme(&mut self, mode: ThemeMode) {
        self.current_theme = mode;
    }

    fn get_theme(&self) -> ThemeMode {
        self.current_theme
    }

    fn colors(&self) -> &'static ThemeColors {
        match self.current_theme {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }

    /// Symbols are drawn in the text color on a transparent background.
    fn qr_colors(&self) -> QrColors {
        QrColors {
            foreground: self.colors().text,
            background: "transparent",
        }
    }
}
