//! In-process decode context.
//!
//! Runs a [`SymbolDecoder`] on a dedicated worker thread and speaks the same
//! message protocol as the web-view decoder page: it announces
//! `{"ready": true}` on startup, answers `"PING"` with the same, and answers
//! every data URI with exactly one `{"success", "data"}` reply.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use super::decode_bridge::{parse_data_uri, DecodeBridge, DecodeContext};
use crate::types::decode::{ContextReply, PING};
use crate::types::errors::DecodeError;

/// The opaque symbol decoding capability.
///
/// Returns `Ok(None)` when the image holds no symbol; errors and panics are
/// reported to the bridge as not-found as well.
pub trait SymbolDecoder: Send + 'static {
    fn decode(&self, image: &[u8], mime: &str) -> Result<Option<String>, String>;
}

/// Computes the reply to one inbound message.
pub fn respond<D: SymbolDecoder + ?Sized>(decoder: &D, message: &str) -> ContextReply {
    if message.is_empty() || message == PING {
        return ContextReply::Ready { ready: true };
    }

    let (mime, bytes) = match parse_data_uri(message) {
        Ok(parts) => parts,
        Err(e) => {
            log::debug!("image load failed: {}", e);
            return ContextReply::not_found();
        }
    };

    match panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(&bytes, &mime))) {
        Ok(Ok(Some(text))) if !text.is_empty() => ContextReply::found(text),
        Ok(Ok(_)) => ContextReply::not_found(),
        Ok(Err(e)) => {
            log::debug!("decoder error: {}", e);
            ContextReply::not_found()
        }
        Err(_) => {
            log::warn!("decoder panicked; reporting no symbol");
            ContextReply::not_found()
        }
    }
}

fn encode(reply: &ContextReply) -> String {
    // Both variants are plain structs of bools and strings.
    serde_json::to_string(reply).unwrap_or_else(|_| r#"{"success":false,"data":null}"#.to_string())
}

/// Decode context backed by a worker thread.
///
/// Dropping the context closes its channel and the worker exits after the
/// message it is processing.
pub struct EmbeddedDecodeContext {
    tx: Mutex<Sender<String>>,
}

impl EmbeddedDecodeContext {
    /// Starts the worker. Every reply (including the startup handshake) is
    /// passed to `reply`.
    pub fn spawn<D, R>(decoder: D, reply: R) -> Result<Self, DecodeError>
    where
        D: SymbolDecoder,
        R: Fn(&str) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>();
        thread::Builder::new()
            .name("qr-decode-context".to_string())
            .spawn(move || {
                reply(&encode(&ContextReply::Ready { ready: true }));
                for message in rx {
                    let answer = respond(&decoder, &message);
                    reply(&encode(&answer));
                }
                log::debug!("decode context stopped");
            })
            .map_err(|e| DecodeError::ContextUnavailable(format!("failed to start worker: {}", e)))?;

        Ok(Self { tx: Mutex::new(tx) })
    }
}

impl DecodeContext for EmbeddedDecodeContext {
    fn post(&self, message: &str) -> Result<(), DecodeError> {
        self.tx
            .lock()
            .map_err(|e| DecodeError::ContextUnavailable(e.to_string()))?
            .send(message.to_string())
            .map_err(|_| DecodeError::ContextUnavailable("decode context stopped".to_string()))
    }
}

impl DecodeBridge {
    /// Creates a bridge wired to a fresh [`EmbeddedDecodeContext`] running
    /// `decoder`.
    pub fn embedded<D: SymbolDecoder>(decoder: D) -> Result<Arc<Self>, DecodeError> {
        let bridge = Arc::new(DecodeBridge::new());
        let sink = DecodeBridge::inbound(&bridge);
        let context = EmbeddedDecodeContext::spawn(decoder, sink)?;
        if bridge.attach(Box::new(context)).is_err() {
            return Err(DecodeError::ContextUnavailable(
                "bridge already has a context".to_string(),
            ));
        }
        Ok(bridge)
    }
}
