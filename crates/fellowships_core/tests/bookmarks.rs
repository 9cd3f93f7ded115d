use chrono::NaiveDate;
use fellowships_core::{
    BookmarkSet, Catalog, CatalogService, CoreConfig, FilterState, MemoryPersistenceStore,
    PersistenceStore, Scholarship, SqlitePersistenceStore, StoreError, StoreResult,
    DEFAULT_BOOKMARK_KEY,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Store wrapper that counts writes and can be switched to fail them.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryPersistenceStore,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl PersistenceStore for RecordingStore {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        self.inner.get_string_array(key)
    }

    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.set_string_array(key, values)
    }
}

fn sample_catalog() -> Catalog {
    Catalog::from_scholarships(vec![
        Scholarship::new("Rhodes", "d", "u", "10/01/2025", 1, ["united_kingdom"]),
        Scholarship::new("Schwarzman", "d", "u", "09/20/2025", 1, ["china"]),
    ])
}

#[test]
fn toggle_twice_restores_state_and_writes_twice() {
    let store = RecordingStore::default();
    let catalog = sample_catalog();
    let id = catalog.scholarships()[0].id;
    let service = CatalogService::open(CoreConfig::default(), catalog, &store);

    let after_first = service.toggle_bookmark(id).unwrap();
    assert!(after_first.contains(id));
    assert!(service.is_bookmarked(id));

    let after_second = service.toggle_bookmark(id).unwrap();
    assert_eq!(after_second, BookmarkSet::new());
    assert!(!service.is_bookmarked(id));
    assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    assert_eq!(
        store.get_string_array(DEFAULT_BOOKMARK_KEY).unwrap(),
        Some(Vec::new())
    );
}

#[test]
fn failed_write_rolls_back_in_memory_state() {
    let store = RecordingStore::default();
    let catalog = sample_catalog();
    let kept = catalog.scholarships()[0].id;
    let other = catalog.scholarships()[1].id;
    let service = CatalogService::open(CoreConfig::default(), catalog, &store);
    service.toggle_bookmark(kept).unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = service.toggle_bookmark(other).unwrap_err();
    assert_eq!(err.id, other);
    assert!(err.to_string().contains("disk full"));

    assert!(service.is_bookmarked(kept));
    assert!(!service.is_bookmarked(other));
    assert_eq!(
        store.get_string_array(DEFAULT_BOOKMARK_KEY).unwrap(),
        Some(vec![kept.to_string()])
    );

    let err = service.toggle_bookmark(kept).unwrap_err();
    assert_eq!(err.id, kept);
    assert!(service.is_bookmarked(kept), "removal must roll back too");
}

#[test]
fn bookmarks_are_restored_on_open_and_invalid_entries_dropped() {
    let store = MemoryPersistenceStore::new();
    let catalog = sample_catalog();
    let id = catalog.scholarships()[1].id;
    store
        .set_string_array(
            DEFAULT_BOOKMARK_KEY,
            &[id.to_string(), "garbage".to_string()],
        )
        .unwrap();

    let service = CatalogService::open(CoreConfig::default(), catalog, &store);
    assert!(service.is_bookmarked(id));
    assert_eq!(service.bookmarks().len(), 1);
}

#[test]
fn bookmarks_only_query_reflects_toggles() {
    let catalog = sample_catalog();
    let id = catalog.scholarships()[1].id;
    let service =
        CatalogService::open(CoreConfig::default(), catalog, MemoryPersistenceStore::new());
    let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
    let filter = FilterState::new().with_bookmarks_only(true);

    assert!(service.query(&filter, today).is_empty());
    service.toggle_bookmark(id).unwrap();
    let view = service.query(&filter, today);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, id);
}

#[test]
fn view_carries_the_bookmarks_it_filtered_with() {
    let catalog = sample_catalog();
    let id = catalog.scholarships()[0].id;
    let service =
        CatalogService::open(CoreConfig::default(), catalog, MemoryPersistenceStore::new());
    let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
    let filter = FilterState::new().with_bookmarks_only(true);
    service.toggle_bookmark(id).unwrap();

    let view = service.view(&filter, today);
    service.toggle_bookmark(id).unwrap();

    assert_eq!(view.scholarships.len(), 1);
    assert!(view
        .scholarships
        .iter()
        .all(|scholarship| view.bookmarks.contains(scholarship.id)));
    assert!(!view.fallback);
    assert!(!service.is_bookmarked(id));
}

#[test]
fn bookmarks_survive_stable_catalog_reload() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bookmarks.sqlite3");
    let config = CoreConfig::default();
    let source = br#"{"scholarships": [
        {"name": "Rhodes", "description": "d", "url": "u", "dueDate": "10/01/2025", "value": 1, "tags": ["united_kingdom"]}
    ]}"#;

    let id = {
        let catalog = fellowships_core::load_catalog(Some(source.as_slice()), &config);
        let id = catalog.scholarships()[0].id;
        let store = SqlitePersistenceStore::open(&db_path).unwrap();
        let service = CatalogService::open(config.clone(), catalog, store);
        service.toggle_bookmark(id).unwrap();
        id
    };

    let catalog = fellowships_core::load_catalog(Some(source.as_slice()), &config);
    let store = SqlitePersistenceStore::open(&db_path).unwrap();
    let service = CatalogService::open(config, catalog, store);
    assert!(service.is_bookmarked(id));
    assert_eq!(service.catalog().scholarships()[0].id, id);
}

#[test]
fn replace_catalog_swaps_snapshot_and_keeps_bookmarks() {
    let catalog = sample_catalog();
    let id = catalog.scholarships()[0].id;
    let service =
        CatalogService::open(CoreConfig::default(), catalog, MemoryPersistenceStore::new());
    service.toggle_bookmark(id).unwrap();

    let before = service.catalog();
    service.replace_catalog(fellowships_core::fallback_catalog());
    assert_eq!(before.len(), 2, "old snapshot is unaffected");
    assert!(service.catalog().is_fallback());
    assert!(service.is_bookmarked(id));
    assert!(service.scholarship(id).is_none());
}

#[test]
fn concurrent_toggles_are_serialized() {
    let store = Arc::new(RecordingStore::default());
    let ids = (0..8).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
    let service = Arc::new(
        CatalogService::open(CoreConfig::default(), sample_catalog(), Arc::clone(&store)),
    );

    let handles = ids
        .iter()
        .copied()
        .map(|id| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.toggle_bookmark(id).unwrap())
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.writes.load(Ordering::SeqCst), ids.len());
    let persisted = store.get_string_array(DEFAULT_BOOKMARK_KEY).unwrap().unwrap();
    assert_eq!(persisted.len(), ids.len());
    for id in &ids {
        assert!(service.is_bookmarked(*id));
    }
}
