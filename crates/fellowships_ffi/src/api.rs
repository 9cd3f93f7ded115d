//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose catalog, bookmark and reminder-planning use-cases to Dart via FRB.
//! - Project core records into display-ready items so the UI never
//!   re-implements deadline or tag rules.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One catalog service per process; the catalog file is read at first use
//!   and on explicit reload only.

use chrono::{Local, NaiveDateTime, TimeZone};
use fellowships_core::{
    core_version as core_version_inner, days_remaining_or_zero, due_date_label,
    init_logging as init_logging_inner, load_catalog, load_catalog_file, ping as ping_inner,
    CatalogService, CoreConfig, FilterState, ReminderLead, Scholarship,
    SortOrder, SqlitePersistenceStore,
};
use log::warn;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use uuid::Uuid;

const DB_FILE_NAME: &str = "fellowships_bookmarks.sqlite3";
const DB_PATH_ENV: &str = "FELLOWSHIPS_DB_PATH";
const CATALOG_PATH_ENV: &str = "FELLOWSHIPS_CATALOG_PATH";
const CONFIG_PATH_ENV: &str = "FELLOWSHIPS_CONFIG_PATH";

type FfiCatalogService = CatalogService<SqlitePersistenceStore>;

static CATALOG_SERVICE: OnceCell<FfiCatalogService> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Selectable filter tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub id: String,
    /// Emoji-prefixed display label.
    pub label: String,
}

/// Display-ready scholarship row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScholarshipItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    /// Raw `MM/DD/YYYY` text.
    pub due_date: String,
    /// `Due: <raw>`.
    pub due_label: String,
    /// Days until the next occurrence; `0` when the date is malformed.
    pub days_remaining: u32,
    /// Known tags only, in id order.
    pub tags: Vec<TagItem>,
    pub bookmarked: bool,
}

/// Catalog view response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQueryResponse {
    pub ok: bool,
    pub items: Vec<ScholarshipItem>,
    /// Whether the built-in fallback catalog is active.
    pub fallback: bool,
    pub message: String,
}

/// Generic action envelope for bookmark/reload calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogActionResponse {
    pub ok: bool,
    /// Bookmark flag after a toggle; `false` for other actions.
    pub bookmarked: bool,
    pub message: String,
}

impl CatalogActionResponse {
    fn success(bookmarked: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            bookmarked,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            bookmarked: false,
            message: message.into(),
        }
    }
}

/// Planned reminder for the platform reminder API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlanResponse {
    pub ok: bool,
    pub title: String,
    pub notes: String,
    /// Local fire time as epoch milliseconds.
    pub fire_at_epoch_ms: Option<i64>,
    pub message: String,
}

impl ReminderPlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            title: String::new(),
            notes: String::new(),
            fire_at_epoch_ms: None,
            message: message.into(),
        }
    }
}

/// Returns filter-menu tags sorted by id.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_tags() -> Vec<TagItem> {
    match catalog_service() {
        Ok(service) => service
            .config()
            .tag_catalog
            .options()
            .into_iter()
            .map(|option| TagItem {
                id: option.id,
                label: option.label,
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Returns the filtered/sorted catalog view as of the local date.
///
/// `sort` accepts `none|deadline_ascending|deadline_descending`; unknown
/// values fail the call instead of silently falling back.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_query(
    selected_tags: Vec<String>,
    bookmarks_only: bool,
    sort: String,
) -> CatalogQueryResponse {
    let failure = |message: String| CatalogQueryResponse {
        ok: false,
        items: Vec::new(),
        fallback: false,
        message,
    };

    let Some(sort_order) = SortOrder::parse(&sort) else {
        return failure(format!("catalog_query failed: unknown sort `{sort}`"));
    };
    let service = match catalog_service() {
        Ok(service) => service,
        Err(err) => return failure(format!("catalog_query failed: {err}")),
    };

    let filter = FilterState::new()
        .with_tags(selected_tags)
        .with_bookmarks_only(bookmarks_only)
        .with_sort(sort_order);
    let today = Local::now().date_naive();
    let view = service.view(&filter, today);
    let items = view
        .scholarships
        .iter()
        .map(|scholarship| {
            to_scholarship_item(
                service,
                scholarship,
                view.bookmarks.contains(scholarship.id),
                today,
            )
        })
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No scholarships match.".to_string()
    } else {
        format!("Showing {} scholarship(s).", items.len())
    };

    CatalogQueryResponse {
        ok: true,
        items,
        fallback: view.fallback,
        message,
    }
}

/// Toggles one bookmark and persists the full set.
///
/// On failure the previous bookmark state is kept and `ok` is `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_toggle_bookmark(scholarship_id: String) -> CatalogActionResponse {
    let result = parse_id(&scholarship_id).and_then(|id| {
        let service = catalog_service()?;
        service
            .toggle_bookmark(id)
            .map(|bookmarks| bookmarks.contains(id))
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => CatalogActionResponse::success(true, "Bookmarked."),
        Ok(false) => CatalogActionResponse::success(false, "Bookmark removed."),
        Err(err) => CatalogActionResponse::failure(format!("catalog_toggle_bookmark failed: {err}")),
    }
}

/// Returns whether `scholarship_id` is bookmarked; `false` for invalid ids.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_is_bookmarked(scholarship_id: String) -> bool {
    match (parse_id(&scholarship_id), catalog_service()) {
        (Ok(id), Ok(service)) => service.is_bookmarked(id),
        _ => false,
    }
}

/// Re-reads the catalog file and swaps the active snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_reload() -> CatalogActionResponse {
    match catalog_service() {
        Ok(service) => {
            let catalog = read_catalog(service.config());
            let count = catalog.len();
            let fallback = catalog.is_fallback();
            service.replace_catalog(catalog);
            CatalogActionResponse::success(
                false,
                format!("Loaded {count} scholarship(s); fallback={fallback}."),
            )
        }
        Err(err) => CatalogActionResponse::failure(format!("catalog_reload failed: {err}")),
    }
}

/// Plans a reminder; the platform layer owns permission prompts and saving.
///
/// - `days_before = None`: tomorrow at the configured hour.
/// - `days_before = Some(n)`: `n` days before the next deadline occurrence.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_plan(scholarship_id: String, days_before: Option<u32>) -> ReminderPlanResponse {
    let lead = days_before.map_or(ReminderLead::Tomorrow, ReminderLead::DaysBefore);
    let planned = parse_id(&scholarship_id).and_then(|id| {
        catalog_service()?
            .plan_reminder(id, lead, Local::now().date_naive())
            .map_err(|err| err.to_string())
    });

    match planned {
        Ok(request) => ReminderPlanResponse {
            ok: true,
            fire_at_epoch_ms: local_epoch_ms(request.fire_at),
            title: request.title,
            notes: request.notes,
            message: "Reminder planned.".to_string(),
        },
        Err(err) => ReminderPlanResponse::failure(format!("reminder_plan failed: {err}")),
    }
}

fn catalog_service() -> Result<&'static FfiCatalogService, String> {
    CATALOG_SERVICE.get_or_try_init(|| {
        let config = read_config();
        let store = SqlitePersistenceStore::open(resolve_path(DB_PATH_ENV).unwrap_or_else(
            || std::env::temp_dir().join(DB_FILE_NAME),
        ))
        .map_err(|err| format!("bookmark store open failed: {err}"))?;
        let catalog = read_catalog(&config);
        Ok(CatalogService::open(config, catalog, store))
    })
}

fn read_config() -> CoreConfig {
    let Some(path) = resolve_path(CONFIG_PATH_ENV) else {
        return CoreConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|raw| CoreConfig::from_json_str(&raw).map_err(|err| err.to_string()));
    parsed.unwrap_or_else(|err| {
        warn!("event=config_load module=ffi status=fallback error={err}");
        CoreConfig::default()
    })
}

fn read_catalog(config: &CoreConfig) -> fellowships_core::Catalog {
    match resolve_path(CATALOG_PATH_ENV) {
        Some(path) => load_catalog_file(path, config),
        None => load_catalog(None, config),
    }
}

fn resolve_path(env_key: &str) -> Option<PathBuf> {
    let raw = std::env::var(env_key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid scholarship id `{value}`"))
}

fn local_epoch_ms(at: NaiveDateTime) -> Option<i64> {
    Local
        .from_local_datetime(&at)
        .earliest()
        .map(|local| local.timestamp_millis())
}

fn to_scholarship_item(
    service: &FfiCatalogService,
    scholarship: &Scholarship,
    bookmarked: bool,
    today: chrono::NaiveDate,
) -> ScholarshipItem {
    let tag_catalog = &service.config().tag_catalog;
    ScholarshipItem {
        id: scholarship.id.to_string(),
        name: scholarship.name.clone(),
        description: scholarship.description.clone(),
        url: scholarship.application_url.clone(),
        due_date: scholarship.due_date.clone(),
        due_label: due_date_label(&scholarship.due_date),
        days_remaining: days_remaining_or_zero(&scholarship.due_date, today),
        tags: scholarship
            .tags
            .iter()
            .filter_map(|tag| {
                tag_catalog.label_for(tag).map(|label| TagItem {
                    id: tag.clone(),
                    label: label.to_string(),
                })
            })
            .collect(),
        bookmarked,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        catalog_is_bookmarked, catalog_query, catalog_reload, catalog_tags,
        catalog_toggle_bookmark, core_version, init_logging, parse_id, ping, reminder_plan,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn catalog_tags_lists_builtin_tags() {
        let tags = catalog_tags();
        assert!(tags.iter().any(|tag| tag.id == "united_kingdom"));
    }

    #[test]
    fn catalog_query_rejects_unknown_sort() {
        let response = catalog_query(Vec::new(), false, "by_value".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("by_value"));
    }

    #[test]
    fn catalog_query_never_returns_empty_full_view() {
        let response = catalog_query(Vec::new(), false, "deadline_ascending".to_string());
        assert!(response.ok, "{}", response.message);
        assert!(!response.items.is_empty());
        assert!(response.items.iter().all(|item| item.due_label.starts_with("Due: ")));
    }

    #[test]
    fn toggle_bookmark_round_trips_through_store() {
        let listed = catalog_query(Vec::new(), false, "none".to_string());
        let id = listed.items[0].id.clone();
        let initially = catalog_is_bookmarked(id.clone());

        let first = catalog_toggle_bookmark(id.clone());
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.bookmarked, !initially);
        assert_eq!(catalog_is_bookmarked(id.clone()), !initially);

        let second = catalog_toggle_bookmark(id.clone());
        assert!(second.ok, "{}", second.message);
        assert_eq!(catalog_is_bookmarked(id), initially);
    }

    #[test]
    fn toggle_bookmark_rejects_invalid_ids() {
        let response = catalog_toggle_bookmark("nope".to_string());
        assert!(!response.ok);
        assert!(parse_id("nope").is_err());
        assert!(!catalog_is_bookmarked("nope".to_string()));
    }

    #[test]
    fn reload_keeps_a_displayable_catalog() {
        let response = catalog_reload();
        assert!(response.ok, "{}", response.message);
        assert!(!catalog_query(Vec::new(), false, "none".to_string())
            .items
            .is_empty());
    }

    #[test]
    fn reminder_plan_composes_title_and_fire_time() {
        let listed = catalog_query(Vec::new(), false, "none".to_string());
        let item = &listed.items[0];
        let plan = reminder_plan(item.id.clone(), Some(1));
        assert!(plan.ok, "{}", plan.message);
        assert!(plan.title.starts_with("Deadline approaching: "));
        assert!(plan.fire_at_epoch_ms.is_some());

        let missing_id = uuid::Uuid::new_v4().to_string();
        let missing = reminder_plan(missing_id.clone(), None);
        assert!(!missing.ok);
        assert_eq!(
            missing.message,
            format!("reminder_plan failed: scholarship not found: {missing_id}")
        );
    }
}
