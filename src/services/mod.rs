// QR Nexus services
// Services provide stateless or self-contained functionality: decoding, payloads, settings, theme, haptics, export.

pub mod decode_bridge;
pub mod decode_context;
pub mod export;
pub mod haptics;
pub mod payload;
pub mod settings_engine;
pub mod theme_engine;
