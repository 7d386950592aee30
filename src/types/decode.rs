use serde::{Deserialize, Serialize};

/// Handshake message posted into the decode context.
pub const PING: &str = "PING";

/// A reply posted by the decode context.
///
/// The two shapes share no required field, so the enum is untagged and the
/// handshake variant is tried first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContextReply {
    /// `{"ready": true}`, sent once at startup and in answer to `PING`.
    Ready { ready: bool },
    /// `{"success": bool, "data": string|null}`.
    Result {
        success: bool,
        data: Option<String>,
    },
}

impl ContextReply {
    pub fn found(text: impl Into<String>) -> Self {
        ContextReply::Result {
            success: true,
            data: Some(text.into()),
        }
    }

    pub fn not_found() -> Self {
        ContextReply::Result {
            success: false,
            data: None,
        }
    }

    /// The decoded text, if the reply carries a successful result.
    pub fn into_text(self) -> Option<String> {
        match self {
            ContextReply::Result {
                success: true,
                data: Some(text),
            } => Some(text),
            _ => None,
        }
    }
}

/// Observable state of a decode bridge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    Idle,
    AwaitingDecode,
}
