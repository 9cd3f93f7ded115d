//! Catalog document parsing with deterministic fallback.
//!
//! # Responsibility
//! - Parse `{ "scholarships": [...] }` JSON into a `Catalog`.
//! - Substitute the built-in fallback catalog when the source is absent,
//!   unreadable, malformed or empty.
//!
//! # Invariants
//! - Parsing is all-or-nothing: one invalid record fails the whole source.
//! - `load_catalog*` never fails and never returns an empty catalog.
//! - No network access and no write-back.

use crate::catalog::{Catalog, CatalogOrigin};
use crate::config::CoreConfig;
use crate::model::scholarship::{
    normalize_tags, stable_scholarship_id, IdStrategy, Scholarship,
};
use crate::model::tag::TagCatalog;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

const FALLBACK_NAME: &str = "🇬🇧 Rhodes Scholarship";
const FALLBACK_DESCRIPTION: &str = "The Rhodes Scholarships are the oldest and most celebrated international fellowship awards in the world. Each year 32 young students from the U.S. are selected as Rhodes Scholars.";
const FALLBACK_URL: &str = "http://www.rhodesscholar.org/";
const FALLBACK_DUE_DATE: &str = "10/01/2025";
const FALLBACK_TAG: &str = "united_kingdom";

/// Reasons a catalog source was rejected.
#[derive(Debug)]
pub enum LoadError {
    /// Host supplied no source bytes.
    MissingSource,
    /// Source file could not be read.
    Io(std::io::Error),
    /// Source is not valid JSON or does not match the document shape.
    InvalidJson(serde_json::Error),
    /// Source parsed but holds no records.
    EmptyCatalog,
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSource => write!(f, "catalog source is missing"),
            Self::Io(err) => write!(f, "catalog source unreadable: {err}"),
            Self::InvalidJson(err) => write!(f, "catalog source is malformed: {err}"),
            Self::EmptyCatalog => write!(f, "catalog source contains no scholarships"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidJson(err) => Some(err),
            Self::MissingSource | Self::EmptyCatalog => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidJson(value)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    scholarships: Vec<ScholarshipRecord>,
}

/// Wire shape of one source record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScholarshipRecord {
    name: String,
    description: String,
    url: String,
    due_date: String,
    value: i64,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parses a catalog document strictly.
///
/// # Errors
/// - `InvalidJson` when the bytes are not JSON, the top-level shape does not
///   match, or any record misses a required field.
/// - `EmptyCatalog` when `scholarships` is empty.
pub fn parse_catalog(bytes: &[u8], id_strategy: IdStrategy) -> Result<Catalog, LoadError> {
    let document: CatalogDocument = serde_json::from_slice(bytes)?;
    if document.scholarships.is_empty() {
        return Err(LoadError::EmptyCatalog);
    }

    let mut ordinals: HashMap<(String, String), u32> = HashMap::new();
    let scholarships = document
        .scholarships
        .into_iter()
        .map(|record| {
            let id = match id_strategy {
                IdStrategy::Stable => {
                    let slot = ordinals
                        .entry((record.name.clone(), record.due_date.clone()))
                        .or_insert(0);
                    let id = stable_scholarship_id(&record.name, &record.due_date, *slot);
                    *slot += 1;
                    id
                }
                IdStrategy::Random => Uuid::new_v4(),
            };
            Scholarship {
                id,
                name: record.name,
                description: record.description,
                application_url: record.url,
                due_date: record.due_date,
                value: record.value,
                tags: normalize_tags(record.tags),
            }
        })
        .collect();

    Ok(Catalog::with_origin(scholarships, CatalogOrigin::Source))
}

/// Loads a catalog from optional source bytes, falling back on any failure.
///
/// # Side effects
/// - Emits `catalog_load` events with status, record count and duration.
/// - Logs each unknown tag once per load.
pub fn load_catalog(source: Option<&[u8]>, config: &CoreConfig) -> Catalog {
    let started_at = Instant::now();
    let parsed = match source {
        Some(bytes) => parse_catalog(bytes, config.id_strategy),
        None => Err(LoadError::MissingSource),
    };
    finish_load(parsed, &config.tag_catalog, started_at)
}

/// Reads and loads a catalog file, falling back on any failure.
pub fn load_catalog_file(path: impl AsRef<Path>, config: &CoreConfig) -> Catalog {
    let started_at = Instant::now();
    let parsed = std::fs::read(path.as_ref())
        .map_err(LoadError::from)
        .and_then(|bytes| parse_catalog(&bytes, config.id_strategy));
    finish_load(parsed, &config.tag_catalog, started_at)
}

/// Returns the deterministic one-record fallback catalog.
pub fn fallback_catalog() -> Catalog {
    let scholarship = Scholarship {
        id: stable_scholarship_id(FALLBACK_NAME, FALLBACK_DUE_DATE, 0),
        name: FALLBACK_NAME.to_string(),
        description: FALLBACK_DESCRIPTION.to_string(),
        application_url: FALLBACK_URL.to_string(),
        due_date: FALLBACK_DUE_DATE.to_string(),
        value: 1,
        tags: BTreeSet::from([FALLBACK_TAG.to_string()]),
    };
    Catalog::with_origin(vec![scholarship], CatalogOrigin::Fallback)
}

fn finish_load(
    parsed: Result<Catalog, LoadError>,
    tag_catalog: &TagCatalog,
    started_at: Instant,
) -> Catalog {
    match parsed {
        Ok(catalog) => {
            log_unknown_tags(&catalog, tag_catalog);
            info!(
                "event=catalog_load module=catalog status=ok count={} duration_ms={}",
                catalog.len(),
                started_at.elapsed().as_millis()
            );
            catalog
        }
        Err(err) => {
            warn!(
                "event=catalog_load module=catalog status=fallback duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            fallback_catalog()
        }
    }
}

fn log_unknown_tags(catalog: &Catalog, tag_catalog: &TagCatalog) {
    let unknown = catalog
        .iter()
        .flat_map(|scholarship| tag_catalog.unknown_tags(scholarship))
        .collect::<BTreeSet<_>>();
    for tag in unknown {
        debug!("event=catalog_unknown_tag module=catalog status=kept tag={tag}");
    }
}

#[cfg(test)]
mod tests {
    use super::{fallback_catalog, parse_catalog, LoadError};
    use crate::model::scholarship::IdStrategy;

    #[test]
    fn missing_tags_default_to_empty_set() {
        let bytes = br#"{"scholarships": [{"name": "A", "description": "d", "url": "u", "dueDate": "01/02/2025", "value": 1}]}"#;
        let catalog = parse_catalog(bytes, IdStrategy::Stable).unwrap();
        assert!(catalog.scholarships()[0].tags.is_empty());
    }

    #[test]
    fn duplicate_name_and_date_get_distinct_stable_ids() {
        let bytes = br#"{"scholarships": [
            {"name": "A", "description": "one", "url": "u", "dueDate": "01/02/2025", "value": 1},
            {"name": "A", "description": "two", "url": "u", "dueDate": "01/02/2025", "value": 1}
        ]}"#;
        let first = parse_catalog(bytes, IdStrategy::Stable).unwrap();
        let second = parse_catalog(bytes, IdStrategy::Stable).unwrap();
        assert_eq!(first.len(), 2);
        assert_ne!(first.scholarships()[0].id, first.scholarships()[1].id);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = parse_catalog(br#"{"scholarships": []}"#, IdStrategy::Stable).unwrap_err();
        assert!(matches!(err, LoadError::EmptyCatalog));
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(fallback_catalog(), fallback_catalog());
        assert_eq!(fallback_catalog().len(), 1);
    }
}
