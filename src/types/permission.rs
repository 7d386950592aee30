use serde::{Deserialize, Serialize};

/// Device capabilities the app has to ask for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Camera,
    MediaLibrary,
}

impl PermissionKind {
    /// Message shown to the user when the permission is refused.
    pub fn denial_message(&self) -> &'static str {
        match self {
            PermissionKind::Camera => "Camera access is needed to scan QR codes.",
            PermissionKind::MediaLibrary => "Gallery access is needed to read QR codes from images.",
        }
    }
}

/// Answer of a permission prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}
