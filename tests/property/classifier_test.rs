//! Property-based tests for payload classification and WiFi payloads.

use proptest::prelude::*;
use qrnexus::services::payload::{classify, wifi_payload};
use qrnexus::types::generate::WifiEncryption;
use qrnexus::types::history::RecordKind;

/// Randomly flips the ASCII case of each character.
fn mixed_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn url_prefix_is_case_insensitive(
        mask in prop::collection::vec(any::<bool>(), 1..8),
        rest in "[a-z0-9./]{0,20}",
        secure in any::<bool>(),
    ) {
        let scheme = if secure { "https://" } else { "http://" };
        let payload = format!("{}{}", mixed_case(scheme, &mask), rest);
        prop_assert_eq!(classify(&payload), RecordKind::Url);
    }

    #[test]
    fn wifi_and_vcard_prefixes_are_case_insensitive(
        mask in prop::collection::vec(any::<bool>(), 1..8),
        rest in "[A-Za-z0-9:;]{0,20}",
    ) {
        prop_assert_eq!(classify(&format!("{}{}", mixed_case("wifi:", &mask), rest)), RecordKind::Wifi);
        prop_assert_eq!(
            classify(&format!("{}{}", mixed_case("begin:vcard", &mask), rest)),
            RecordKind::Contact
        );
    }

    #[test]
    fn text_without_known_prefix_is_text(payload in "[0-9 ][ -~]{0,30}") {
        prop_assert_eq!(classify(&payload), RecordKind::Text);
    }

    #[test]
    fn classify_never_panics(payload in ".*") {
        let _ = classify(&payload);
    }

    #[test]
    fn wifi_payload_always_classifies_as_wifi(
        ssid in "[ -~]{1,20}",
        password in "[ -~]{0,20}",
        encryption in prop_oneof![
            Just(WifiEncryption::Wpa),
            Just(WifiEncryption::Wep),
            Just(WifiEncryption::NoPass),
        ],
    ) {
        let payload = wifi_payload(&ssid, &password, encryption);
        prop_assert_eq!(classify(&payload), RecordKind::Wifi);
        prop_assert!(payload.ends_with(";;"));
        if encryption == WifiEncryption::NoPass {
            prop_assert!(payload.ends_with("P:;;"));
        }
    }
}
