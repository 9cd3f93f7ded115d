//! Domain model for the scholarship catalog.
//!
//! # Responsibility
//! - Define the immutable `Scholarship` record and its stable identity.
//! - Define the user-mutable overlay (`BookmarkSet`) and the ephemeral
//!   `FilterState` passed in by presentation callers.
//! - Define the validated tag-label mapping (`TagCatalog`).
//!
//! # Invariants
//! - Scholarship ids are unique within one loaded catalog.
//! - Tags are stored lowercase and deduplicated.

pub mod bookmark;
pub mod filter;
pub mod scholarship;
pub mod tag;
