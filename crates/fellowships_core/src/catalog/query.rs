//! Filtered and sorted catalog views.
//!
//! # Invariants
//! - Output is a pure function of `(catalog, bookmarks, filter, today)`.
//! - Deadline sorts are stable: equal day counts keep catalog order in both
//!   directions.
//! - Malformed due dates sort as `0` days remaining.

use crate::catalog::Catalog;
use crate::deadline::days_remaining_or_zero;
use crate::model::bookmark::BookmarkSet;
use crate::model::filter::{FilterState, SortOrder};
use crate::model::scholarship::Scholarship;
use chrono::NaiveDate;

/// Applies bookmark filter, tag filter (OR) and sort order to `catalog`.
pub fn filter_catalog<'a>(
    catalog: &'a Catalog,
    bookmarks: &BookmarkSet,
    filter: &FilterState,
    today: NaiveDate,
) -> Vec<&'a Scholarship> {
    let matching = catalog
        .iter()
        .filter(|scholarship| !filter.bookmarks_only || bookmarks.contains(scholarship.id))
        .filter(|scholarship| {
            filter.selected_tags.is_empty() || scholarship.has_any_tag(&filter.selected_tags)
        });

    if filter.sort == SortOrder::None {
        return matching.collect();
    }

    let mut keyed = matching
        .map(|scholarship| (days_remaining_or_zero(&scholarship.due_date, today), scholarship))
        .collect::<Vec<_>>();
    match filter.sort {
        SortOrder::DeadlineAscending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::DeadlineDescending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        SortOrder::None => {}
    }
    keyed.into_iter().map(|(_, scholarship)| scholarship).collect()
}
