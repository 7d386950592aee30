use thiserror::Error;

use super::permission::PermissionKind;

// === StoreError ===

/// Errors raised by the key-value store backing all durable state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying SQLite database failed.
    #[error("Store database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The store lock was poisoned by a panicking writer.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// === HistoryError ===

/// Errors related to scan/generated history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Reading or writing the key-value store failed.
    #[error("History store error: {0}")]
    Store(#[from] StoreError),
    /// The stored list could not be parsed as JSON.
    #[error("History data is corrupt: {0}")]
    Corrupt(String),
    /// The list could not be serialized.
    #[error("History serialization error: {0}")]
    Serialization(String),
    /// The record kind is not allowed in this list.
    #[error("Invalid kind for {list} history: {kind}")]
    InvalidKind { list: String, kind: String },
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            HistoryError::Corrupt(err.to_string())
        } else {
            HistoryError::Serialization(err.to_string())
        }
    }
}

// === SettingsError ===

/// Errors related to persisted user preferences.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the key-value store failed.
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

// === DecodeError ===

/// Errors related to the image decode bridge.
///
/// A decode that simply finds no symbol is not an error: it is delivered as
/// `None` to the result handler.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A decode request is already in flight on this bridge.
    #[error("Decode already in progress")]
    Busy,
    /// The decode context could not accept the message.
    #[error("Decode context unavailable: {0}")]
    ContextUnavailable(String),
    /// The input is not a base64 image data URI.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    /// No reply arrived before the caller's deadline.
    #[error("Decode timed out")]
    TimedOut,
    /// The request was abandoned before a reply arrived.
    #[error("Decode request abandoned")]
    Abandoned,
}

// === ExportError ===

/// Errors related to exporting a rendered symbol as an image file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The renderer failed to produce a raster image.
    #[error("Render failed: {0}")]
    Render(String),
    /// The rendered data URI is malformed.
    #[error("Invalid image data: {0}")]
    InvalidData(String),
    /// Writing the file failed.
    #[error("Export file system error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<base64::DecodeError> for ExportError {
    fn from(err: base64::DecodeError) -> Self {
        ExportError::InvalidData(err.to_string())
    }
}

// === PermissionError ===

/// Errors related to device permission prompts.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The user refused the permission; the flow is aborted.
    #[error("{}", .0.denial_message())]
    Denied(PermissionKind),
}

// === FlowError ===

/// Errors surfaced by the application flows that chain the components above.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
