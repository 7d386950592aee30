//! Raster export of generated symbols.
//!
//! The generation surface renders a payload and hands back a PNG as a data
//! URI; this module writes that image to disk for saving or sharing.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::types::errors::ExportError;

/// The external component drawing QR symbols.
pub trait SymbolRenderer {
    /// Renders `payload` and returns the raster image as a data URI
    /// (`data:image/png;base64,...`).
    fn render_png(&self, payload: &str) -> Result<String, ExportError>;
}

/// File name used when saving a symbol to the gallery.
pub const SAVE_FILE_NAME: &str = "qr-save.png";
/// File name used when sharing a symbol.
pub const SHARE_FILE_NAME: &str = "qr-share.png";

/// Decodes a PNG data URI and writes it to `dir/file_name`, creating `dir`.
///
/// A bare base64 string without the data-URI header is accepted as well.
pub fn export_png(data_uri: &str, dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    let encoded = match data_uri.strip_prefix("data:") {
        Some(rest) => {
            let (mime, data) = rest
                .split_once(";base64,")
                .ok_or_else(|| ExportError::InvalidData("not a base64 data URI".to_string()))?;
            if mime != "image/png" {
                return Err(ExportError::InvalidData(format!(
                    "expected image/png, got {}",
                    mime
                )));
            }
            data
        }
        None => data_uri,
    };

    let bytes = BASE64.decode(encoded.trim())?;
    if bytes.is_empty() {
        return Err(ExportError::InvalidData("empty image".to_string()));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, &bytes)?;
    log::debug!("exported {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
