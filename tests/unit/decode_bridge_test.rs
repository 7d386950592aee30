//! Unit tests for the decode bridge and the embedded decode context.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use qrnexus::services::decode_bridge::{data_uri, DecodeBridge, DecodeContext};
use qrnexus::services::decode_context::SymbolDecoder;
use qrnexus::types::decode::BridgeState;
use qrnexus::types::errors::DecodeError;

/// Treats image bytes of the form `QR:<text>` as a symbol encoding `<text>`.
struct FakeDecoder;

impl SymbolDecoder for FakeDecoder {
    fn decode(&self, image: &[u8], _mime: &str) -> Result<Option<String>, String> {
        let text = String::from_utf8_lossy(image);
        Ok(text.strip_prefix("QR:").map(str::to_string))
    }
}

/// Context that records posted messages and never replies.
#[derive(Clone, Default)]
struct SilentContext {
    posted: Arc<Mutex<Vec<String>>>,
}

impl DecodeContext for SilentContext {
    fn post(&self, message: &str) -> Result<(), DecodeError> {
        self.posted.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

struct ClosedContext;

impl DecodeContext for ClosedContext {
    fn post(&self, _message: &str) -> Result<(), DecodeError> {
        Err(DecodeError::ContextUnavailable("closed".to_string()))
    }
}

fn png(bytes: &[u8]) -> String {
    data_uri("image/png", bytes)
}

fn silent_bridge() -> (DecodeBridge, SilentContext) {
    let context = SilentContext::default();
    let bridge = DecodeBridge::with_context(Box::new(context.clone()));
    (bridge, context)
}

fn recording_handler(bridge: &DecodeBridge) -> mpsc::Receiver<Option<String>> {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    bridge.set_result_handler(move |result| {
        let _ = tx.lock().unwrap().send(result);
    });
    rx
}

// ─── Reply handling ───

#[test]
fn test_result_reaches_handler_once() {
    let (bridge, context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"QR:HELLO")).unwrap();
    assert_eq!(bridge.state(), BridgeState::AwaitingDecode);
    assert_eq!(context.posted.lock().unwrap().len(), 1);

    bridge.handle_message(r#"{"success":true,"data":"HELLO"}"#);
    assert_eq!(rx.try_recv().unwrap(), Some("HELLO".to_string()));
    assert_eq!(bridge.state(), BridgeState::Idle);

    // A stray second reply has no request to resolve.
    bridge.handle_message(r#"{"success":true,"data":"HELLO"}"#);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_not_found_reply_delivers_none() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"plain image")).unwrap();
    bridge.handle_message(r#"{"success":false,"data":null}"#);
    assert_eq!(rx.try_recv().unwrap(), None);
}

#[test]
fn test_malformed_reply_delivers_none() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"x")).unwrap();
    bridge.handle_message("<<garbage>>");
    assert_eq!(rx.try_recv().unwrap(), None);
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_handshake_never_reaches_handler() {
    let (bridge, context) = silent_bridge();
    let rx = recording_handler(&bridge);
    assert!(!bridge.is_ready());

    bridge.ping().unwrap();
    assert_eq!(context.posted.lock().unwrap()[0], "PING");
    bridge.handle_message(r#"{"ready":true}"#);

    assert!(bridge.is_ready());
    assert!(rx.try_recv().is_err());
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_handshake_while_awaiting_keeps_request() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"QR:A")).unwrap();
    bridge.handle_message("READY");
    assert_eq!(bridge.state(), BridgeState::AwaitingDecode);

    bridge.handle_message(r#"{"success":true,"data":"A"}"#);
    assert_eq!(rx.try_recv().unwrap(), Some("A".to_string()));
}

// ─── Request lifecycle ───

#[test]
fn test_second_decode_while_awaiting_is_busy() {
    let (bridge, context) = silent_bridge();
    bridge.decode(&png(b"one")).unwrap();

    assert!(matches!(bridge.decode(&png(b"two")), Err(DecodeError::Busy)));
    assert_eq!(context.posted.lock().unwrap().len(), 1);
}

#[test]
fn test_abandon_returns_to_idle_and_ignores_late_reply() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"one")).unwrap();
    bridge.abandon();
    assert_eq!(bridge.state(), BridgeState::Idle);

    bridge.handle_message(r#"{"success":true,"data":"late"}"#);
    assert!(rx.try_recv().is_err());

    bridge.decode(&png(b"two")).unwrap();
    assert_eq!(bridge.state(), BridgeState::AwaitingDecode);
}

#[test]
fn test_late_reply_after_abandon_does_not_resolve_next_request() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"QR:first")).unwrap();
    bridge.abandon();
    bridge.decode(&png(b"QR:second")).unwrap();

    bridge.handle_message(r#"{"success":true,"data":"first"}"#);
    assert!(rx.try_recv().is_err());
    assert_eq!(bridge.state(), BridgeState::AwaitingDecode);

    bridge.handle_message(r#"{"success":true,"data":"second"}"#);
    assert_eq!(rx.try_recv().unwrap(), Some("second".to_string()));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_abandon_while_idle_drops_no_reply() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.abandon();
    bridge.decode(&png(b"QR:only")).unwrap();
    bridge.handle_message(r#"{"success":true,"data":"only"}"#);
    assert_eq!(rx.try_recv().unwrap(), Some("only".to_string()));
}

#[test]
fn test_ready_false_is_a_not_found_result() {
    let (bridge, _context) = silent_bridge();
    let rx = recording_handler(&bridge);

    bridge.decode(&png(b"x")).unwrap();
    bridge.handle_message(r#"{"ready":false}"#);
    assert_eq!(rx.try_recv().unwrap(), None);
    assert!(!bridge.is_ready());
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_decode_without_context_fails_and_stays_idle() {
    let bridge = DecodeBridge::new();
    assert!(matches!(
        bridge.decode(&png(b"x")),
        Err(DecodeError::ContextUnavailable(_))
    ));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_failed_post_frees_the_slot() {
    let bridge = DecodeBridge::with_context(Box::new(ClosedContext));
    assert!(bridge.decode(&png(b"x")).is_err());
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_attach_only_once() {
    let bridge = DecodeBridge::new();
    assert!(bridge.attach(Box::new(SilentContext::default())).is_ok());
    assert!(bridge.attach(Box::new(SilentContext::default())).is_err());
}

// ─── Async ───

#[tokio::test]
async fn test_decode_async_resolves_with_reply() {
    let (bridge, _context) = silent_bridge();
    let bridge = Arc::new(bridge);

    let replier = bridge.clone();
    let handle = tokio::spawn(async move {
        while replier.state() != BridgeState::AwaitingDecode {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        replier.handle_message(r#"{"success":true,"data":"ASYNC"}"#);
    });

    let result = bridge.decode_async(&png(b"QR:ASYNC")).await.unwrap();
    handle.await.unwrap();
    assert_eq!(result, Some("ASYNC".to_string()));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[tokio::test]
async fn test_decode_with_timeout_against_silent_context() {
    let (bridge, _context) = silent_bridge();
    let result = bridge
        .decode_with_timeout(&png(b"x"), Duration::from_millis(50))
        .await;
    assert!(matches!(result, Err(DecodeError::TimedOut)));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[tokio::test]
async fn test_decode_async_abandoned() {
    let (bridge, _context) = silent_bridge();
    let bridge = Arc::new(bridge);

    let other = bridge.clone();
    let handle = tokio::spawn(async move {
        while other.state() != BridgeState::AwaitingDecode {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        other.abandon();
    });

    let result = bridge.decode_async(&png(b"x")).await;
    handle.await.unwrap();
    assert!(matches!(result, Err(DecodeError::Abandoned)));
}

#[tokio::test]
async fn test_late_reply_after_timeout_does_not_resolve_next_request() {
    let (bridge, _context) = silent_bridge();
    let bridge = Arc::new(bridge);

    let result = bridge
        .decode_with_timeout(&png(b"QR:first"), Duration::from_millis(20))
        .await;
    assert!(matches!(result, Err(DecodeError::TimedOut)));

    let replier = bridge.clone();
    let handle = tokio::spawn(async move {
        while replier.state() != BridgeState::AwaitingDecode {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        replier.handle_message(r#"{"success":true,"data":"first"}"#);
        replier.handle_message(r#"{"success":true,"data":"second"}"#);
    });

    let result = bridge.decode_async(&png(b"QR:second")).await.unwrap();
    handle.await.unwrap();
    assert_eq!(result, Some("second".to_string()));
}

#[tokio::test]
async fn test_dropped_decode_future_frees_the_slot() {
    let (bridge, _context) = silent_bridge();

    let image = png(b"QR:gone");
    let pending = bridge.decode_async(&image);
    let outer = tokio::time::timeout(Duration::from_millis(20), pending).await;
    assert!(outer.is_err());
    assert_eq!(bridge.state(), BridgeState::Idle);

    let rx = recording_handler(&bridge);
    bridge.decode(&png(b"QR:next")).unwrap();
    bridge.handle_message(r#"{"success":true,"data":"gone"}"#);
    assert!(rx.try_recv().is_err());
    bridge.handle_message(r#"{"success":true,"data":"next"}"#);
    assert_eq!(rx.try_recv().unwrap(), Some("next".to_string()));
}

// ─── Embedded context ───

#[tokio::test]
async fn test_embedded_context_decodes_symbol() {
    let bridge = DecodeBridge::embedded(FakeDecoder).unwrap();
    let result = bridge
        .decode_with_timeout(&png(b"QR:HELLO"), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(result, Some("HELLO".to_string()));
}

#[tokio::test]
async fn test_embedded_context_reports_missing_symbol() {
    let bridge = DecodeBridge::embedded(FakeDecoder).unwrap();
    let result = bridge
        .decode_with_timeout(&png(b"no symbol here"), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_embedded_context_rejects_non_image_uri() {
    let bridge = DecodeBridge::embedded(FakeDecoder).unwrap();
    let result = bridge
        .decode_with_timeout("data:text/plain;base64,UVI6SEk=", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_embedded_context_handshakes() {
    let bridge = DecodeBridge::embedded(FakeDecoder).unwrap();
    bridge.ping().unwrap();
    for _ in 0..200 {
        if bridge.is_ready() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(bridge.is_ready());
    assert_eq!(bridge.state(), BridgeState::Idle);
}
