// QR Nexus shared type definitions
// Each submodule defines types used across the crate.

pub mod config;
pub mod decode;
pub mod errors;
pub mod generate;
pub mod history;
pub mod permission;
pub mod settings;
