// QR Nexus Settings Engine
// Manages the theme and haptics preferences: loading, toggling and persisting them.
// Each preference is a plain string under its own key in the key-value store.

use std::sync::Arc;

use crate::database::KeyValueStore;
use crate::types::errors::SettingsError;
use crate::types::settings::{AppSettings, ThemeMode, HAPTICS_KEY, THEME_KEY};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppSettings, SettingsError>;
    fn load_or_default(&mut self) -> AppSettings;
    fn get_settings(&self) -> &AppSettings;
    fn set_theme(&mut self, mode: ThemeMode) -> Result<(), SettingsError>;
    fn toggle_theme(&mut self) -> Result<ThemeMode, SettingsError>;
    fn set_haptics_enabled(&mut self, enabled: bool) -> Result<(), SettingsError>;
    fn toggle_haptics(&mut self) -> Result<bool, SettingsError>;
}

/// Settings engine persisting preferences through a key-value store.
pub struct SettingsEngine {
    store: Arc<dyn KeyValueStore + Send + Sync>,
    settings: AppSettings,
}

impl SettingsEngine {
    /// Creates a SettingsEngine holding the defaults until `load` is called.
    pub fn new(store: Arc<dyn KeyValueStore + Send + Sync>) -> Self {
        Self {
            store,
            settings: AppSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads both preferences. Absent or unrecognised values fall back to the
    /// defaults (light theme, haptics on).
    fn load(&mut self) -> Result<AppSettings, SettingsError> {
        let theme = self.store.get(THEME_KEY)?;
        let haptics = self.store.get(HAPTICS_KEY)?;
        self.settings = AppSettings::from_stored(theme.as_deref(), haptics.as_deref());
        Ok(self.settings.clone())
    }

    /// Like `load`, but a store failure keeps the defaults and is only logged.
    fn load_or_default(&mut self) -> AppSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("settings load failed, using defaults: {}", e);
                self.settings = AppSettings::default();
                self.settings.clone()
            }
        }
    }

    fn get_settings(&self) -> &AppSettings {
        &self.settings
    }

    fn set_theme(&mut self, mode: ThemeMode) -> Result<(), SettingsError> {
        self.store.set(THEME_KEY, mode.as_str())?;
        self.settings.theme = mode;
        Ok(())
    }

    fn toggle_theme(&mut self) -> Result<ThemeMode, SettingsError> {
        let next = self.settings.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn set_haptics_enabled(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.store
            .set(HAPTICS_KEY, if enabled { "true" } else { "false" })?;
        self.settings.haptics_enabled = enabled;
        Ok(())
    }

    fn toggle_haptics(&mut self) -> Result<bool, SettingsError> {
        let next = !self.settings.haptics_enabled;
        self.set_haptics_enabled(next)?;
        Ok(next)
    }
}
