//! Persistence contracts used by core services.
//!
//! # Responsibility
//! - Define the external key-value store contract for bookmarks.
//! - Keep SQLite details out of service orchestration.

pub mod kv_store;
