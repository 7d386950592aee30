//! Web-view hosted components.
//!
//! Uses `wry` for the platform web view:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView

pub mod decoder_view;
