// QR Nexus state managers
// Managers own persisted or stateful data: history lists and permission answers.

pub mod history_manager;
pub mod permission_manager;
