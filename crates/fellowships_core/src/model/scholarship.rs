//! Scholarship domain record.
//!
//! # Responsibility
//! - Define the canonical record rendered by list/detail views.
//! - Derive identifiers that survive catalog reloads.
//!
//! # Invariants
//! - `due_date` keeps the exact source text (`MM/DD/YYYY`); it is parsed on
//!   demand by `crate::deadline`, never rewritten.
//! - `tags` is a set: lowercase, trimmed, no empty entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier used as the bookmark key.
pub type ScholarshipId = Uuid;

/// Namespace for name-based (v5) scholarship ids.
const SCHOLARSHIP_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93b7_5d08_a2c4_7e51_0b9f_d336);

/// How the loader assigns ids to source records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Name-based UUID v5 over `name` + `due_date`; identical across reloads.
    #[default]
    Stable,
    /// Fresh UUID v4 on every load. Bookmarks do not survive a reload.
    Random,
}

/// Canonical scholarship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: ScholarshipId,
    /// Display name; may embed emoji markers.
    pub name: String,
    pub description: String,
    /// Not validated as a well-formed URL.
    pub application_url: String,
    /// Raw `MM/DD/YYYY` text.
    pub due_date: String,
    pub value: i64,
    pub tags: BTreeSet<String>,
}

impl Scholarship {
    /// Builds a record with a stable id derived from `name` and `due_date`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        application_url: impl Into<String>,
        due_date: impl Into<String>,
        value: i64,
        tags: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let name = name.into();
        let due_date = due_date.into();
        Self {
            id: stable_scholarship_id(&name, &due_date, 0),
            name,
            description: description.into(),
            application_url: application_url.into(),
            due_date,
            value,
            tags: normalize_tags(tags),
        }
    }

    /// Returns whether this record carries at least one of `selected`.
    pub fn has_any_tag(&self, selected: &BTreeSet<String>) -> bool {
        !self.tags.is_disjoint(selected)
    }
}

/// Derives the name-based id for one source record.
///
/// `ordinal` disambiguates records sharing the same `(name, due_date)` pair
/// inside one source; the first occurrence uses `0`.
pub fn stable_scholarship_id(name: &str, due_date: &str, ordinal: u32) -> ScholarshipId {
    let mut key = format!("{name}\u{1f}{due_date}");
    if ordinal > 0 {
        key.push('\u{1f}');
        key.push_str(&ordinal.to_string());
    }
    Uuid::new_v5(&SCHOLARSHIP_ID_NAMESPACE, key.as_bytes())
}

/// Lowercases, trims and deduplicates tag identifiers.
pub fn normalize_tags(tags: impl IntoIterator<Item = impl AsRef<str>>) -> BTreeSet<String> {
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}

/// Normalizes one tag; returns `None` for blank input.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
