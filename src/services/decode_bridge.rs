//! Request/response bridge to an isolated decode context.
//!
//! The bridge posts an image, as a base64 data URI, into a decode context
//! (a hidden web view or the in-process [`EmbeddedDecodeContext`]) and
//! correlates the single reply that comes back:
//!
//! ```text
//! Idle --decode()--> AwaitingDecode --reply--> Idle
//! ```
//!
//! Only one request may be in flight; a second `decode` while awaiting is
//! rejected with [`DecodeError::Busy`]. "No symbol", "image failed to load"
//! and "decoder threw" all arrive as `None`. The context's `{"ready": true}`
//! handshake is consumed here and never reaches the result handler.
//!
//! `decode` itself imposes no deadline. A context that never replies leaves
//! the bridge awaiting until [`DecodeBridge::abandon`] is called;
//! [`DecodeBridge::decode_with_timeout`] does that automatically, as does
//! dropping a pending `decode_async` future.
//!
//! Replies carry no request id. The context answers every posted image
//! exactly once and in order, so the bridge counts abandoned requests and
//! discards that many replies before resolving the next request.
//!
//! [`EmbeddedDecodeContext`]: crate::services::decode_context::EmbeddedDecodeContext

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::sync::oneshot;

use crate::types::decode::{BridgeState, ContextReply, PING};
use crate::types::errors::DecodeError;

/// Builds `data:<mime>;base64,<data>` for an image.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Splits an image data URI into its MIME type and decoded bytes.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), DecodeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::InvalidDataUri("missing data: scheme".to_string()))?;
    let (mime, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| DecodeError::InvalidDataUri("not base64 encoded".to_string()))?;
    if !mime.starts_with("image/") {
        return Err(DecodeError::InvalidDataUri(format!("not an image: {}", mime)));
    }
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| DecodeError::InvalidDataUri(format!("base64 decode error: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

/// The isolated side of the bridge. `post` must not block on the decode.
pub trait DecodeContext: Send + Sync {
    fn post(&self, message: &str) -> Result<(), DecodeError>;
}

/// Callback receiving each decode result.
pub type ResultHandler = Arc<dyn Fn(Option<String>) + Send + Sync>;

/// A reply as understood by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Handshake,
    Result(Option<String>),
}

/// Parses a raw message posted by the decode context.
///
/// Anything that is neither a handshake nor a well-formed result is a
/// not-found result.
pub fn parse_inbound(raw: &str) -> Inbound {
    if raw.trim() == "READY" {
        return Inbound::Handshake;
    }
    match serde_json::from_str::<ContextReply>(raw) {
        Ok(ContextReply::Ready { ready: true }) => Inbound::Handshake,
        Ok(reply) => Inbound::Result(reply.into_text()),
        Err(e) => {
            log::warn!("malformed decode reply treated as not found: {}", e);
            Inbound::Result(None)
        }
    }
}

enum Responder {
    Handler,
    Channel(oneshot::Sender<Option<String>>),
}

enum Slot {
    Idle,
    Awaiting { request: u64, responder: Responder },
}

struct Inner {
    slot: Slot,
    next_request: u64,
    /// Abandoned requests whose replies are still to come.
    orphaned: u32,
    ready: bool,
}

/// Bridge between callers and one decode context.
pub struct DecodeBridge {
    context: OnceLock<Box<dyn DecodeContext>>,
    handler: Mutex<Option<ResultHandler>>,
    inner: Mutex<Inner>,
}

impl Default for DecodeBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeBridge {
    /// Creates a bridge with no context attached yet.
    pub fn new() -> Self {
        Self {
            context: OnceLock::new(),
            handler: Mutex::new(None),
            inner: Mutex::new(Inner {
                slot: Slot::Idle,
                next_request: 0,
                orphaned: 0,
                ready: false,
            }),
        }
    }

    /// Creates a bridge already attached to `context`.
    pub fn with_context(context: Box<dyn DecodeContext>) -> Self {
        let bridge = Self::new();
        let _ = bridge.context.set(context);
        bridge
    }

    /// Attaches the decode context. A bridge holds at most one context; a
    /// second call returns the rejected context.
    pub fn attach(&self, context: Box<dyn DecodeContext>) -> Result<(), Box<dyn DecodeContext>> {
        self.context.set(context)
    }

    /// Returns a sink that feeds context messages into `bridge`.
    ///
    /// The sink holds a weak reference, so a context owned by the bridge does
    /// not keep the bridge alive.
    pub fn inbound(bridge: &Arc<Self>) -> impl Fn(&str) + Send + Sync + 'static {
        let weak: Weak<Self> = Arc::downgrade(bridge);
        move |message: &str| {
            if let Some(bridge) = weak.upgrade() {
                bridge.handle_message(message);
            }
        }
    }

    /// Registers the callback receiving results of `decode`.
    pub fn set_result_handler<F>(&self, handler: F)
    where
        F: Fn(Option<String>) + Send + Sync + 'static,
    {
        *lock(&self.handler) = Some(Arc::new(handler));
    }

    pub fn state(&self) -> BridgeState {
        match lock(&self.inner).slot {
            Slot::Idle => BridgeState::Idle,
            Slot::Awaiting { .. } => BridgeState::AwaitingDecode,
        }
    }

    /// Whether the context has announced itself with a handshake.
    pub fn is_ready(&self) -> bool {
        lock(&self.inner).ready
    }

    /// Sends the handshake message; the answer only marks the bridge ready.
    pub fn ping(&self) -> Result<(), DecodeError> {
        self.post(PING)
    }

    /// Posts `data_uri` for decoding. The result is delivered to the
    /// registered result handler.
    pub fn decode(&self, data_uri: &str) -> Result<(), DecodeError> {
        let request = self.begin(Responder::Handler)?;
        self.dispatch(request, data_uri)
    }

    /// Posts `data_uri` and waits for its result.
    ///
    /// Returns `Err(DecodeError::Abandoned)` if the request is abandoned
    /// before the reply arrives.
    ///
    /// Dropping the future before it resolves abandons the request.
    pub async fn decode_async(&self, data_uri: &str) -> Result<Option<String>, DecodeError> {
        let (tx, rx) = oneshot::channel();
        let request = self.begin(Responder::Channel(tx))?;
        let _pending = Pending { bridge: self, request };
        self.dispatch(request, data_uri)?;
        rx.await.map_err(|_| DecodeError::Abandoned)
    }

    /// `decode_async` with a deadline. On expiry the request is abandoned so
    /// the bridge accepts new work.
    pub async fn decode_with_timeout(
        &self,
        data_uri: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DecodeError> {
        let (tx, rx) = oneshot::channel();
        let request = self.begin(Responder::Channel(tx))?;
        let _pending = Pending { bridge: self, request };
        self.dispatch(request, data_uri)?;
        match tokio::time::timeout(timeout, rx).await {
            Ok(result) => result.map_err(|_| DecodeError::Abandoned),
            Err(_) => {
                self.orphan(request);
                log::warn!("decode request {} timed out after {:?}", request, timeout);
                Err(DecodeError::TimedOut)
            }
        }
    }

    /// Drops the in-flight request, if any. A reply arriving later is ignored.
    pub fn abandon(&self) {
        let mut inner = lock(&self.inner);
        if let Slot::Awaiting { request, .. } = inner.slot {
            log::debug!("abandoning decode request {}", request);
            inner.slot = Slot::Idle;
            inner.orphaned += 1;
        }
    }

    /// Handles one message posted by the decode context.
    pub fn handle_message(&self, raw: &str) {
        match parse_inbound(raw) {
            Inbound::Handshake => {
                lock(&self.inner).ready = true;
                log::debug!("decode context ready");
            }
            Inbound::Result(text) => self.deliver(text),
        }
    }

    fn deliver(&self, text: Option<String>) {
        let slot = {
            let mut inner = lock(&self.inner);
            if inner.orphaned > 0 {
                inner.orphaned -= 1;
                log::debug!("late reply to an abandoned decode request dropped");
                return;
            }
            std::mem::replace(&mut inner.slot, Slot::Idle)
        };
        match slot {
            Slot::Idle => {
                log::warn!("decode reply with no request in flight dropped");
            }
            Slot::Awaiting {
                request,
                responder: Responder::Handler,
            } => {
                log::debug!("decode request {} resolved (found: {})", request, text.is_some());
                let handler = lock(&self.handler).clone();
                match handler {
                    Some(handler) => handler(text),
                    None => log::warn!("decode result for request {} has no handler", request),
                }
            }
            Slot::Awaiting {
                request,
                responder: Responder::Channel(tx),
            } => {
                log::debug!("decode request {} resolved (found: {})", request, text.is_some());
                let _ = tx.send(text);
            }
        }
    }

    fn begin(&self, responder: Responder) -> Result<u64, DecodeError> {
        let mut inner = lock(&self.inner);
        if let Slot::Awaiting { .. } = inner.slot {
            return Err(DecodeError::Busy);
        }
        inner.next_request += 1;
        let request = inner.next_request;
        inner.slot = Slot::Awaiting { request, responder };
        Ok(request)
    }

    /// Abandons `request` if it is still in flight; its reply will be dropped.
    fn orphan(&self, request: u64) {
        let mut inner = lock(&self.inner);
        if matches!(inner.slot, Slot::Awaiting { request: current, .. } if current == request) {
            log::debug!("abandoning decode request {}", request);
            inner.slot = Slot::Idle;
            inner.orphaned += 1;
        }
    }

    /// Clears the slot if it still belongs to `request`. Used when the
    /// request never reached the context.
    fn finish(&self, request: u64) {
        let mut inner = lock(&self.inner);
        if matches!(inner.slot, Slot::Awaiting { request: current, .. } if current == request) {
            inner.slot = Slot::Idle;
        }
    }

    fn dispatch(&self, request: u64, data_uri: &str) -> Result<(), DecodeError> {
        if let Err(e) = self.post(data_uri) {
            self.finish(request);
            return Err(e);
        }
        log::debug!("decode request {} posted ({} bytes)", request, data_uri.len());
        Ok(())
    }

    fn post(&self, message: &str) -> Result<(), DecodeError> {
        self.context
            .get()
            .ok_or_else(|| DecodeError::ContextUnavailable("no decode context attached".to_string()))?
            .post(message)
    }
}

/// Abandons an awaited request when its future is dropped unresolved.
struct Pending<'a> {
    bridge: &'a DecodeBridge,
    request: u64,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.bridge.orphan(self.request);
    }
}

/// Locks a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
