//! Catalog query and bookmark use-case service.
//!
//! # Responsibility
//! - Hold the active catalog snapshot and serve filtered/sorted views.
//! - Own the bookmark set and keep it in lockstep with the persistence store.
//!
//! # Invariants
//! - `query` is read-only and idempotent for identical inputs.
//! - Toggles are serialized; each one writes the full set to the store
//!   before the in-memory set changes.
//! - A failed write leaves the in-memory set at its pre-toggle value.
//! - Catalog replacement swaps the whole snapshot at once.
//! - Unreadable persisted bookmarks never keep the catalog from being served.

use crate::catalog::query::filter_catalog;
use crate::catalog::Catalog;
use crate::config::CoreConfig;
use crate::model::bookmark::BookmarkSet;
use crate::model::filter::FilterState;
use crate::model::scholarship::{Scholarship, ScholarshipId};
use crate::repo::kv_store::{PersistenceStore, StoreError};
use crate::service::reminder_service::{ReminderError, ReminderLead, ReminderRequest};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Bookmark write failure surfaced to callers.
#[derive(Debug)]
pub struct PersistenceError {
    /// Id whose toggle was rolled back.
    pub id: ScholarshipId,
    pub source: StoreError,
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to persist bookmark toggle for {}: {}",
            self.id, self.source
        )
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// One consistent query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub scholarships: Vec<Scholarship>,
    /// Bookmarks the filter was evaluated against.
    pub bookmarks: BookmarkSet,
    pub fallback: bool,
}

/// Query engine over one catalog snapshot plus persisted bookmarks.
pub struct CatalogService<S: PersistenceStore> {
    config: CoreConfig,
    catalog: RwLock<Arc<Catalog>>,
    bookmarks: Mutex<BookmarkSet>,
    store: S,
}

impl<S: PersistenceStore> CatalogService<S> {
    /// Creates the service and reads persisted bookmarks once.
    ///
    /// Persisted values that are not valid ids are dropped with a warning.
    /// An unreadable bookmark key starts the service with no bookmarks; the
    /// next successful toggle rewrites the key.
    pub fn open(config: CoreConfig, catalog: Catalog, store: S) -> Self {
        let stored = match store.get_string_array(&config.bookmark_key) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=bookmarks_load module=service status=fallback key={} error={err}",
                    config.bookmark_key
                );
                Vec::new()
            }
        };
        let (bookmarks, rejected) = BookmarkSet::from_string_array(&stored);
        if !rejected.is_empty() {
            warn!(
                "event=bookmarks_load module=service status=partial rejected={}",
                rejected.len()
            );
        }
        info!(
            "event=bookmarks_load module=service status=ok count={} catalog_count={}",
            bookmarks.len(),
            catalog.len()
        );

        Self {
            config,
            catalog: RwLock::new(Arc::new(catalog)),
            bookmarks: Mutex::new(bookmarks),
            store,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Returns the active catalog snapshot.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the active catalog. Bookmarks are kept as-is.
    pub fn replace_catalog(&self, catalog: Catalog) {
        let count = catalog.len();
        let fallback = catalog.is_fallback();
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
        info!(
            "event=catalog_replace module=service status=ok count={count} fallback={fallback}"
        );
    }

    /// Returns one scholarship from the active catalog.
    pub fn scholarship(&self, id: ScholarshipId) -> Option<Scholarship> {
        self.catalog().get(id).cloned()
    }

    /// Produces the ordered view for `filter` as of `today`.
    pub fn query(&self, filter: &FilterState, today: NaiveDate) -> Vec<Scholarship> {
        self.view(filter, today).scholarships
    }

    /// Like [`Self::query`], also returning the bookmark set and catalog
    /// origin the view was computed from.
    pub fn view(&self, filter: &FilterState, today: NaiveDate) -> CatalogView {
        let catalog = self.catalog();
        let bookmarks = self.bookmarks();
        let scholarships = filter_catalog(&catalog, &bookmarks, filter, today)
            .into_iter()
            .cloned()
            .collect();
        CatalogView {
            scholarships,
            bookmarks,
            fallback: catalog.is_fallback(),
        }
    }

    /// Builds the reminder for one scholarship of the active catalog.
    ///
    /// # Errors
    /// - `UnknownScholarship` when `id` is not in the active catalog.
    /// - `Deadline` / `InvalidLead` when the fire time cannot be resolved.
    pub fn plan_reminder(
        &self,
        id: ScholarshipId,
        lead: ReminderLead,
        today: NaiveDate,
    ) -> Result<ReminderRequest, ReminderError> {
        let scholarship = self
            .scholarship(id)
            .ok_or(ReminderError::UnknownScholarship(id))?;
        ReminderRequest::for_scholarship(&scholarship, lead, today, self.config.reminder_time())
    }

    /// Returns a copy of the current bookmark set.
    pub fn bookmarks(&self) -> BookmarkSet {
        self.bookmarks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_bookmarked(&self, id: ScholarshipId) -> bool {
        self.bookmarks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Inserts `id` if absent, removes it if present, then persists.
    ///
    /// Every call writes the full resulting set, including repeated toggles
    /// of the same id.
    ///
    /// # Errors
    /// - `PersistenceError` when the store write fails; the in-memory set is
    ///   left unchanged.
    pub fn toggle_bookmark(&self, id: ScholarshipId) -> Result<BookmarkSet, PersistenceError> {
        let mut current = self.bookmarks.lock().unwrap_or_else(PoisonError::into_inner);
        let next = current.toggled(id);
        let added = next.contains(id);

        if let Err(source) = self
            .store
            .set_string_array(&self.config.bookmark_key, &next.to_string_array())
        {
            error!(
                "event=bookmark_toggle module=service status=error id={id} error={source}"
            );
            return Err(PersistenceError { id, source });
        }

        *current = next.clone();
        info!(
            "event=bookmark_toggle module=service status=ok id={id} added={added} count={}",
            next.len()
        );
        Ok(next)
    }
}
