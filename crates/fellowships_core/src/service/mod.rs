//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate catalog, bookmark and reminder use-cases.
//! - Keep UI/FFI layers decoupled from storage and platform details.

pub mod catalog_service;
pub mod reminder_service;
