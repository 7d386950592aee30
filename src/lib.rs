//! QR Nexus — scan, generate and keep a history of QR codes.
//!
//! This library crate exposes the app core, storage and services for the
//! presentation layer and the integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
