//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `fellowships_core` linkage without the Flutter runtime.
//! - Print a deterministic catalog summary for an optional catalog file.
//!
//! Usage: `fellowships_cli [catalog.json]`

use chrono::Local;
use fellowships_core::{
    days_remaining_or_zero, load_catalog, load_catalog_file, CatalogService, CoreConfig,
    FilterState, MemoryPersistenceStore, SortOrder,
};

fn main() {
    println!("fellowships_core ping={}", fellowships_core::ping());
    println!("fellowships_core version={}", fellowships_core::core_version());

    let config = CoreConfig::default();
    let catalog = match std::env::args().nth(1) {
        Some(path) => load_catalog_file(path, &config),
        None => load_catalog(None, &config),
    };
    println!(
        "catalog count={} fallback={}",
        catalog.len(),
        catalog.is_fallback()
    );

    let service = CatalogService::open(config, catalog, MemoryPersistenceStore::new());

    let today = Local::now().date_naive();
    let filter = FilterState::new().with_sort(SortOrder::DeadlineAscending);
    for scholarship in service.query(&filter, today) {
        println!(
            "{:>4}d  {}  {}",
            days_remaining_or_zero(&scholarship.due_date, today),
            scholarship.due_date,
            scholarship.name
        );
    }
}
