use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of records kept per history list.
pub const MAX_HISTORY: usize = 50;

/// Category of a QR payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Url,
    Wifi,
    Text,
    Contact,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Url => "url",
            RecordKind::Wifi => "wifi",
            RecordKind::Text => "text",
            RecordKind::Contact => "contact",
        }
    }

    /// Parses the wire name of a kind (`url`, `wifi`, `text`, `contact`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "url" => Some(RecordKind::Url),
            "wifi" => Some(RecordKind::Wifi),
            "text" => Some(RecordKind::Text),
            "contact" => Some(RecordKind::Contact),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two independent history lists and the store keys they live under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryList {
    /// Payloads decoded from the camera or a gallery image.
    Scanned,
    /// Payloads the user generated and kept.
    Generated,
}

impl HistoryList {
    pub fn storage_key(&self) -> &'static str {
        match self {
            HistoryList::Scanned => "scans",
            HistoryList::Generated => "generated",
        }
    }

    /// Whether `kind` may be stored in this list. Generated records never
    /// carry `contact`: there is no contact generation tab.
    pub fn accepts(&self, kind: RecordKind) -> bool {
        match self {
            HistoryList::Scanned => true,
            HistoryList::Generated => kind != RecordKind::Contact,
        }
    }
}

impl fmt::Display for HistoryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryList::Scanned => f.write_str("scanned"),
            HistoryList::Generated => f.write_str("generated"),
        }
    }
}

/// A single scanned or generated payload.
///
/// Field names on the wire match the stored JSON format
/// (`id`, `data`, `type`, `timestamp`, `favorite`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "data")]
    pub payload: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Creation time in milliseconds since the UNIX epoch.
    #[serde(rename = "timestamp")]
    pub created_at: i64,
    #[serde(default)]
    pub favorite: bool,
}
