use fellowships_core::db::migrations::latest_version;
use fellowships_core::db::{open_db, open_db_in_memory, DbError};
use chrono::NaiveDate;
use fellowships_core::{
    fallback_catalog, CatalogService, CoreConfig, FilterState, PersistenceStore,
    SqlitePersistenceStore, StoreError, DEFAULT_BOOKMARK_KEY,
};

#[test]
fn open_db_applies_latest_migration() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_string_arrays';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(table_count, 1);
}

#[test]
fn open_db_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 99, .. }
    ));
}

#[test]
fn sqlite_store_round_trips_and_overwrites() {
    let store = SqlitePersistenceStore::open_in_memory().unwrap();
    assert_eq!(store.get_string_array("bookmarks").unwrap(), None);

    store
        .set_string_array("bookmarks", &["a".to_string(), "b".to_string()])
        .unwrap();
    store.set_string_array("bookmarks", &["c".to_string()]).unwrap();
    assert_eq!(
        store.get_string_array("bookmarks").unwrap(),
        Some(vec!["c".to_string()])
    );
}

#[test]
fn sqlite_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite3");
    SqlitePersistenceStore::open(&path)
        .unwrap()
        .set_string_array("k", &["v".to_string()])
        .unwrap();

    let reopened = SqlitePersistenceStore::open(&path).unwrap();
    assert_eq!(
        reopened.get_string_array("k").unwrap(),
        Some(vec!["v".to_string()])
    );
}

#[test]
fn corrupt_stored_value_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_string_arrays (key, value) VALUES ('k', '{\"not\": \"an array\"}');",
        [],
    )
    .unwrap();

    let store = SqlitePersistenceStore::new(conn);
    let err = store.get_string_array("k").unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn corrupt_bookmark_value_does_not_block_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bookmarks.sqlite3");
    let conn = open_db(&db_path).unwrap();
    conn.execute(
        "INSERT INTO kv_string_arrays (key, value) VALUES (?1, 'not json');",
        [DEFAULT_BOOKMARK_KEY],
    )
    .unwrap();
    drop(conn);

    let store = SqlitePersistenceStore::open(&db_path).unwrap();
    let service = CatalogService::open(CoreConfig::default(), fallback_catalog(), store);
    assert!(service.bookmarks().is_empty());

    let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
    let view = service.query(&FilterState::new(), today);
    assert_eq!(view.len(), 1);

    let id = view[0].id;
    service.toggle_bookmark(id).unwrap();
    let reopened = SqlitePersistenceStore::open(&db_path).unwrap();
    assert_eq!(
        reopened.get_string_array(DEFAULT_BOOKMARK_KEY).unwrap(),
        Some(vec![id.to_string()])
    );
}
