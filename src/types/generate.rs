use serde::{Deserialize, Serialize};

use super::history::RecordKind;

/// WiFi security mode as written in the `T:` field of a WiFi payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "nopass",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WPA" => Some(WifiEncryption::Wpa),
            "WEP" => Some(WifiEncryption::Wep),
            "nopass" => Some(WifiEncryption::NoPass),
            _ => None,
        }
    }
}

/// What the user typed on one of the generation tabs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationInput {
    Url {
        value: String,
    },
    Text {
        value: String,
    },
    Wifi {
        ssid: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        encryption: WifiEncryption,
    },
}

impl GenerationInput {
    /// The history kind a payload generated from this input is saved under.
    pub fn kind(&self) -> RecordKind {
        match self {
            GenerationInput::Url { .. } => RecordKind::Url,
            GenerationInput::Text { .. } => RecordKind::Text,
            GenerationInput::Wifi { .. } => RecordKind::Wifi,
        }
    }
}
