//! Hidden web view hosting the symbol decoder page.
//!
//! The page (`resources/decoder.html`) draws each posted image onto a canvas,
//! runs jsQR over the pixels and replies through `window.ipc.postMessage`.
//! Messages reach the page as synthetic `message` events evaluated on the
//! event-loop thread.

use std::sync::{Arc, Mutex};

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use wry::WebViewBuilder;

use crate::services::decode_bridge::{DecodeBridge, DecodeContext};
use crate::types::decode::PING;
use crate::types::errors::DecodeError;

const DECODER_HTML: &str = include_str!("../../resources/decoder.html");

#[derive(Debug)]
pub enum DecoderEvent {
    /// Deliver a message to the page.
    Post(String),
}

/// Decode context forwarding messages to the decoder page's event loop.
pub struct WebViewDecodeContext {
    proxy: Mutex<EventLoopProxy<DecoderEvent>>,
}

impl WebViewDecodeContext {
    pub fn new(proxy: EventLoopProxy<DecoderEvent>) -> Self {
        Self { proxy: Mutex::new(proxy) }
    }
}

impl DecodeContext for WebViewDecodeContext {
    fn post(&self, message: &str) -> Result<(), DecodeError> {
        self.proxy
            .lock()
            .map_err(|e| DecodeError::ContextUnavailable(e.to_string()))?
            .send_event(DecoderEvent::Post(message.to_string()))
            .map_err(|_| DecodeError::ContextUnavailable("decoder event loop closed".to_string()))
    }
}

/// Script raising a `message` event carrying `message` inside the page.
pub fn dispatch_script(message: &str) -> String {
    format!(
        "window.dispatchEvent(new MessageEvent('message', {{ data: {} }}));",
        serde_json::Value::from(message)
    )
}

/// Opens the hidden decoder view, attaches it to `bridge` and runs the event
/// loop on the calling thread. Only returns on setup failure.
pub fn run(bridge: Arc<DecodeBridge>) -> Result<(), DecodeError> {
    crate::logging::init();
    let event_loop: EventLoop<DecoderEvent> = EventLoopBuilder::with_user_event().build();
    if bridge
        .attach(Box::new(WebViewDecodeContext::new(event_loop.create_proxy())))
        .is_err()
    {
        return Err(DecodeError::ContextUnavailable(
            "bridge already has a context".to_string(),
        ));
    }

    let window = WindowBuilder::new()
        .with_title("qrnexus decoder")
        .with_visible(false)
        .with_inner_size(tao::dpi::LogicalSize::new(1.0, 1.0))
        .build(&event_loop)
        .map_err(|e| DecodeError::ContextUnavailable(format!("window: {}", e)))?;

    let sink = DecodeBridge::inbound(&bridge);
    let builder = WebViewBuilder::new()
        .with_html(DECODER_HTML)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            sink(msg.body().as_str());
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| DecodeError::ContextUnavailable("no GTK container".to_string()))?;
        builder.build_gtk(vbox)
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window);

    let webview = webview.map_err(|e| DecodeError::ContextUnavailable(format!("web view: {}", e)))?;
    log::info!("decoder view started");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                bridge.abandon();
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(DecoderEvent::Post(message)) => {
                if let Err(e) = webview.evaluate_script(&dispatch_script(&message)) {
                    log::warn!("failed to post to decoder page: {}", e);
                    if message != PING {
                        bridge.handle_message(r#"{"success":false,"data":null}"#);
                    }
                }
            }
            _ => {}
        }
    })
}
