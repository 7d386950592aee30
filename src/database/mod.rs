//! QR Nexus database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value store every persisted value goes through.
//!
//! # Usage
//!
//! ```no_run
//! use qrnexus::database::{Database, KeyValueStore};
//!
//! // Open a persistent database
//! let db = Database::open("qrnexus.db").expect("failed to open database");
//! db.set("theme", "dark").expect("failed to write");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! assert_eq!(db.get("theme").unwrap(), None);
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::KeyValueStore;
