//! Immutable scholarship catalog snapshots.
//!
//! # Responsibility
//! - Own one ordered, read-only list of scholarships.
//! - Parse bundled catalog documents (`loader`) and derive filtered,
//!   sorted views (`query`).
//!
//! # Invariants
//! - A catalog is never mutated after construction; reloads build a new one.
//! - Ids are unique within one catalog.
//! - A loaded catalog always holds at least one record.

pub mod loader;
pub mod query;

use crate::model::scholarship::{Scholarship, ScholarshipId};
use log::warn;
use std::collections::HashSet;

/// Where a catalog snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Parsed from host-supplied bytes or built by the caller.
    Source,
    /// Built-in record set used when the source is missing or malformed.
    Fallback,
}

/// Ordered, immutable scholarship list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    scholarships: Vec<Scholarship>,
    origin: CatalogOrigin,
}

impl Catalog {
    /// Builds a catalog from caller-provided records.
    ///
    /// Later records reusing an earlier id are dropped so ids stay unique.
    pub fn from_scholarships(scholarships: Vec<Scholarship>) -> Self {
        Self::with_origin(scholarships, CatalogOrigin::Source)
    }

    pub(crate) fn with_origin(scholarships: Vec<Scholarship>, origin: CatalogOrigin) -> Self {
        let mut seen = HashSet::with_capacity(scholarships.len());
        let mut unique = Vec::with_capacity(scholarships.len());
        for scholarship in scholarships {
            if seen.insert(scholarship.id) {
                unique.push(scholarship);
            } else {
                warn!(
                    "event=catalog_duplicate_id module=catalog status=skipped id={}",
                    scholarship.id
                );
            }
        }
        Self {
            scholarships: unique,
            origin,
        }
    }

    pub fn scholarships(&self) -> &[Scholarship] {
        &self.scholarships
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scholarship> {
        self.scholarships.iter()
    }

    pub fn len(&self) -> usize {
        self.scholarships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scholarships.is_empty()
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == CatalogOrigin::Fallback
    }

    /// Returns one record by id.
    pub fn get(&self, id: ScholarshipId) -> Option<&Scholarship> {
        self.scholarships.iter().find(|scholarship| scholarship.id == id)
    }
}
