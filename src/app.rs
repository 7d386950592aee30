//! App Core for QR Nexus.
//!
//! Central struct holding the database, settings, theme, haptics, permission
//! manager and decode bridge, plus the flows that chain them: camera scan,
//! gallery scan, generate-and-save and export.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::database::connection::Database;
use crate::managers::history_manager::{HistoryManager, HistoryManagerTrait};
use crate::managers::permission_manager::{
    GrantAll, PermissionManager, PermissionManagerTrait, PermissionProvider,
};
use crate::logging;
use crate::platform;
use crate::services::decode_bridge::{data_uri, DecodeBridge};
use crate::services::export::{export_png, SymbolRenderer, SAVE_FILE_NAME, SHARE_FILE_NAME};
use crate::services::haptics::{HapticEngine, Haptics, ImpactStyle, LogEngine, NotificationKind};
use crate::services::payload::build_payload;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::types::config::AppConfig;
use crate::types::errors::{FlowError, HistoryError, SettingsError, StoreError};
use crate::types::generate::GenerationInput;
use crate::types::history::{HistoryList, HistoryRecord};
use crate::types::permission::PermissionKind;
use crate::types::settings::ThemeMode;

/// Result of a scan attempt that got as far as the decoder.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A payload was decoded and is now the newest scan.
    Saved(HistoryRecord),
    /// The image held no readable symbol.
    NotFound,
}

/// Where an exported symbol goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// Saved to the device gallery; needs media-library access.
    Save,
    /// Handed to the share sheet.
    Share,
}

/// Central application struct holding all managers and services.
///
/// History repositories borrow the database and are created on demand via
/// [`App::history`].
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub theme_engine: ThemeEngine,
    pub haptics: Haptics,
    pub permission_manager: PermissionManager,
    pub decode_bridge: Arc<DecodeBridge>,
}

impl App {
    /// Creates an App over the database at `db_path` with headless defaults:
    /// logging haptics, all permissions granted and a bridge waiting for a
    /// decode context.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_components(
            db,
            Box::new(LogEngine),
            Box::new(GrantAll),
            Arc::new(DecodeBridge::new()),
        ))
    }

    /// Creates an App from the resolved configuration. Installs the logger
    /// if the host has not.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        logging::init();
        Self::new(config.database_path())
    }

    /// Creates an App from explicit platform components.
    ///
    /// Settings are not read here; call [`App::startup`].
    pub fn with_components(
        db: Arc<Database>,
        haptic_engine: Box<dyn HapticEngine>,
        permissions: Box<dyn PermissionProvider>,
        decode_bridge: Arc<DecodeBridge>,
    ) -> Self {
        let settings_engine = SettingsEngine::new(db.clone());
        let defaults = settings_engine.get_settings().clone();
        Self {
            db,
            theme_engine: ThemeEngine::new(defaults.theme),
            haptics: Haptics::new(haptic_engine, defaults.haptics_enabled),
            settings_engine,
            permission_manager: PermissionManager::new(permissions),
            decode_bridge,
        }
    }

    /// Startup sequence: load preferences and apply them to the theme and
    /// haptics. A store failure keeps the defaults.
    pub fn startup(&mut self) {
        let settings = self.settings_engine.load_or_default();
        self.theme_engine.set_theme(settings.theme);
        self.haptics.set_enabled(settings.haptics_enabled);
        log::info!(
            "qrnexus started (theme: {}, haptics: {})",
            settings.theme.as_str(),
            settings.haptics_enabled
        );
    }

    /// Repository over one of the history lists.
    pub fn history(&self, list: HistoryList) -> HistoryManager<'_, Database> {
        HistoryManager::new(self.db.as_ref(), list)
    }

    // ─── Scanning ───

    /// Asks for camera access before the scanner is shown.
    pub fn open_camera(&mut self) -> Result<(), FlowError> {
        self.permission_manager.require(PermissionKind::Camera)?;
        Ok(())
    }

    /// Records a payload recognised by the live camera feed.
    pub fn record_camera_scan(&self, payload: &str) -> Result<ScanOutcome, FlowError> {
        self.haptics.notification(NotificationKind::Success);
        let record = self.save_scan(payload)?;
        Ok(ScanOutcome::Saved(record))
    }

    /// Turns a decode result into a scan outcome, saving found payloads.
    pub fn handle_decode_result(&self, result: Option<String>) -> Result<ScanOutcome, FlowError> {
        match result {
            None => {
                self.haptics.notification(NotificationKind::Error);
                Ok(ScanOutcome::NotFound)
            }
            Some(payload) => {
                self.haptics.notification(NotificationKind::Success);
                let record = self.save_scan(&payload)?;
                Ok(ScanOutcome::Saved(record))
            }
        }
    }

    fn save_scan(&self, payload: &str) -> Result<HistoryRecord, HistoryError> {
        let scans = self.history(HistoryList::Scanned);
        let id = scans.append(payload, None)?;
        scans
            .get(&id)?
            .ok_or_else(|| HistoryError::Corrupt(format!("record {} missing after append", id)))
    }

    // ─── Generation ───

    /// Adds the symbol built from `input` to the generated history.
    ///
    /// Returns `Ok(None)` when the input produces an empty payload.
    pub fn save_generated(&self, input: &GenerationInput) -> Result<Option<HistoryRecord>, FlowError> {
        let payload = build_payload(input);
        if payload.is_empty() {
            return Ok(None);
        }
        let generated = self.history(HistoryList::Generated);
        let id = generated.append(&payload, Some(input.kind()))?;
        self.haptics.notification(NotificationKind::Success);
        Ok(generated.get(&id)?)
    }

    /// Renders the symbol for `input`, writes it as PNG into `dir` (the
    /// platform cache directory when `None`) and records it in the generated
    /// history.
    pub fn export_generated(
        &mut self,
        input: &GenerationInput,
        renderer: &dyn SymbolRenderer,
        target: ExportTarget,
        dir: Option<&Path>,
    ) -> Result<Option<PathBuf>, FlowError> {
        let payload = build_payload(input);
        if payload.is_empty() {
            return Ok(None);
        }
        self.haptics.impact(ImpactStyle::Medium);

        let file_name = match target {
            ExportTarget::Save => {
                self.permission_manager.require(PermissionKind::MediaLibrary)?;
                SAVE_FILE_NAME
            }
            ExportTarget::Share => SHARE_FILE_NAME,
        };

        let image = renderer.render_png(&payload)?;
        let cache_dir;
        let dir = match dir {
            Some(dir) => dir,
            None => {
                cache_dir = platform::get_cache_dir();
                cache_dir.as_path()
            }
        };
        let path = export_png(&image, dir, file_name)?;

        self.history(HistoryList::Generated)
            .append(&payload, Some(input.kind()))?;
        if target == ExportTarget::Save {
            self.haptics.notification(NotificationKind::Success);
        }
        Ok(Some(path))
    }

    // ─── Settings ───

    /// Flips the theme, persists it and applies it to the theme engine.
    pub fn toggle_theme(&mut self) -> Result<ThemeMode, SettingsError> {
        let mode = self.settings_engine.toggle_theme()?;
        self.theme_engine.set_theme(mode);
        self.haptics.selection();
        Ok(mode)
    }

    /// Flips vibration, persists it and applies it to the haptics component.
    pub fn toggle_haptics(&mut self) -> Result<bool, SettingsError> {
        let enabled = self.settings_engine.toggle_haptics()?;
        self.haptics.set_enabled(enabled);
        Ok(enabled)
    }

    /// Deletes every record of `list`.
    pub fn clear_history(&self, list: HistoryList) -> Result<(), HistoryError> {
        self.history(list).clear()?;
        self.haptics.notification(NotificationKind::Warning);
        Ok(())
    }
}

fn lock_app(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Decodes an image picked from the gallery and records the payload.
///
/// Sequence: media-library permission → decode round-trip → persist. The app
/// lock is released while the decode is in flight.
pub async fn scan_gallery_image(
    app: &Mutex<App>,
    image: &[u8],
    mime: &str,
) -> Result<ScanOutcome, FlowError> {
    let bridge = {
        let mut a = lock_app(app);
        a.haptics.impact(ImpactStyle::Medium);
        a.permission_manager.require(PermissionKind::MediaLibrary)?;
        a.decode_bridge.clone()
    };

    let result = bridge.decode_async(&data_uri(mime, image)).await?;

    let a = lock_app(app);
    a.handle_decode_result(result)
}
