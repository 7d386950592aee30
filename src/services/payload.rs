//! Payload classification and construction.
//!
//! Scanned payloads are classified once, when they enter history. Generated
//! payloads are built from the active generation tab's input.

use crate::types::generate::{GenerationInput, WifiEncryption};
use crate::types::history::RecordKind;

/// Classifies a decoded payload by its (case-insensitive) prefix.
///
/// `http://`/`https://` → url, `wifi:` → wifi, `begin:vcard` → contact,
/// anything else → text.
pub fn classify(payload: &str) -> RecordKind {
    if starts_with_ignore_case(payload, "http://") || starts_with_ignore_case(payload, "https://") {
        RecordKind::Url
    } else if starts_with_ignore_case(payload, "wifi:") {
        RecordKind::Wifi
    } else if starts_with_ignore_case(payload, "begin:vcard") {
        RecordKind::Contact
    } else {
        RecordKind::Text
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Formats a WiFi network as `WIFI:T:<ENC>;S:<SSID>;P:<PASS>;;`.
///
/// The password is dropped for open networks. SSID and password are written
/// verbatim: `;`, `:`, `,` and `"` are not escaped, so stored payloads stay
/// byte-compatible with earlier history entries.
pub fn wifi_payload(ssid: &str, password: &str, encryption: WifiEncryption) -> String {
    let password = match encryption {
        WifiEncryption::NoPass => "",
        _ => password,
    };
    format!(
        "WIFI:T:{};S:{};P:{};;",
        encryption.as_str(),
        ssid,
        password
    )
}

/// Builds the exact string handed to the generation surface.
///
/// Returns an empty string when there is nothing to render: blank URL/text
/// input, or a WiFi network without an SSID.
pub fn build_payload(input: &GenerationInput) -> String {
    match input {
        GenerationInput::Url { value } | GenerationInput::Text { value } => {
            value.trim().to_string()
        }
        GenerationInput::Wifi {
            ssid,
            password,
            encryption,
        } => {
            if ssid.trim().is_empty() {
                return String::new();
            }
            wifi_payload(ssid, password, *encryption)
        }
    }
}
