//! Core domain logic for the Fellowships scholarship catalog.
//! This crate is the single source of truth for catalog, deadline and
//! bookmark rules; UI layers only render what it returns.

pub mod catalog;
pub mod config;
pub mod db;
pub mod deadline;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::loader::{
    fallback_catalog, load_catalog, load_catalog_file, parse_catalog, LoadError,
};
pub use catalog::query::filter_catalog;
pub use catalog::{Catalog, CatalogOrigin};
pub use config::{ConfigError, CoreConfig, DEFAULT_BOOKMARK_KEY, DEFAULT_REMINDER_HOUR};
pub use deadline::{
    days_remaining_or_zero, days_until, due_date_label, next_deadline, DueDate,
    MalformedDateError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bookmark::BookmarkSet;
pub use model::filter::{FilterState, SortOrder};
pub use model::scholarship::{stable_scholarship_id, IdStrategy, Scholarship, ScholarshipId};
pub use model::tag::{TagCatalog, TagCatalogError, TagOption};
pub use repo::kv_store::{
    MemoryPersistenceStore, PersistenceStore, SqlitePersistenceStore, StoreError, StoreResult,
};
pub use service::catalog_service::{CatalogService, CatalogView, PersistenceError};
pub use service::reminder_service::{
    reminder_fire_at, ReminderError, ReminderLead, ReminderPlanner, ReminderRequest,
    ReminderService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
