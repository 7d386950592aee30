// QR Nexus platform paths
// Resolves where the database and exported images live on each OS.
//
// Mobile hosts normally pass an explicit directory through `QRNEXUS_DATA_DIR`;
// these defaults cover desktop builds and tests.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "qrnexus";

#[cfg_attr(
    not(any(target_os = "linux", target_os = "macos", target_os = "windows")),
    allow(dead_code)
)]
fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

/// Returns the platform-specific data directory for QR Nexus.
///
/// - **Linux**: `$XDG_DATA_HOME/qrnexus` or `~/.local/share/qrnexus`
/// - **macOS**: `~/Library/Application Support/QRNexus`
/// - **Windows**: `%APPDATA%/QRNexus`
/// - elsewhere: `<tmp>/qrnexus`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var_os("XDG_DATA_HOME") {
            Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
            _ => home_dir().join(".local").join("share").join(APP_DIR),
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("QRNexus")
    }
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(home_dir)
            .join("QRNexus")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        env::temp_dir().join(APP_DIR)
    }
}

/// Returns the platform-specific cache directory, used for exported images.
///
/// - **Linux**: `$XDG_CACHE_HOME/qrnexus` or `~/.cache/qrnexus`
/// - **macOS**: `~/Library/Caches/QRNexus`
/// - **Windows**: `%LOCALAPPDATA%/QRNexus/cache`
/// - elsewhere: `<tmp>/qrnexus/cache`
pub fn get_cache_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var_os("XDG_CACHE_HOME") {
            Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
            _ => home_dir().join(".cache").join(APP_DIR),
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Caches").join("QRNexus")
    }
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(home_dir)
            .join("QRNexus")
            .join("cache")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        env::temp_dir().join(APP_DIR).join("cache")
    }
}
