//! Ephemeral filter/sort state supplied by presentation callers.

use crate::model::scholarship::normalize_tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordering applied to a catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep catalog order.
    #[default]
    None,
    /// Soonest next deadline first.
    DeadlineAscending,
    /// Latest next deadline first.
    DeadlineDescending,
}

impl SortOrder {
    /// Stable string id used across the FFI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DeadlineAscending => "deadline_ascending",
            Self::DeadlineDescending => "deadline_descending",
        }
    }

    /// Parses one sort id; accepts surrounding whitespace and any case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "deadline_ascending" | "asc" => Some(Self::DeadlineAscending),
            "deadline_descending" | "desc" => Some(Self::DeadlineDescending),
            _ => None,
        }
    }
}

/// Filter state for one catalog view request. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// OR semantics: a record matches when it carries any selected tag.
    pub selected_tags: BTreeSet<String>,
    pub bookmarks_only: bool,
    pub sort: SortOrder,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selected tags with normalized values.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.selected_tags = normalize_tags(tags);
        self
    }

    pub fn with_bookmarks_only(mut self, bookmarks_only: bool) -> Self {
        self.bookmarks_only = bookmarks_only;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}
