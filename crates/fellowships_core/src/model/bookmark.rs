//! Bookmark overlay over the immutable catalog.
//!
//! # Invariants
//! - `toggled` never mutates the receiver; callers commit the returned set
//!   only after it has been persisted.
//! - String encoding is the hyphenated UUID form, sorted.

use crate::model::scholarship::ScholarshipId;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Set of bookmarked scholarship ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    ids: BTreeSet<ScholarshipId>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ScholarshipId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScholarshipId> {
        self.ids.iter()
    }

    /// Returns a copy with `id` inserted if absent or removed if present.
    pub fn toggled(&self, id: ScholarshipId) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(&id) {
            ids.insert(id);
        }
        Self { ids }
    }

    /// Encodes ids for the string-array persistence contract.
    pub fn to_string_array(&self) -> Vec<String> {
        self.ids.iter().map(ToString::to_string).collect()
    }

    /// Decodes persisted ids.
    ///
    /// Returns the decoded set plus every value that is not a valid UUID.
    pub fn from_string_array(values: &[String]) -> (Self, Vec<String>) {
        let mut ids = BTreeSet::new();
        let mut rejected = Vec::new();
        for value in values {
            match Uuid::parse_str(value.trim()) {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => rejected.push(value.clone()),
            }
        }
        (Self { ids }, rejected)
    }
}

impl FromIterator<ScholarshipId> for BookmarkSet {
    fn from_iter<T: IntoIterator<Item = ScholarshipId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BookmarkSet;
    use uuid::Uuid;

    #[test]
    fn toggled_is_an_involution_and_leaves_receiver_untouched() {
        let id = Uuid::new_v4();
        let empty = BookmarkSet::new();
        let once = empty.toggled(id);
        assert!(empty.is_empty());
        assert!(once.contains(id));
        assert_eq!(once.toggled(id), empty);
    }

    #[test]
    fn from_string_array_reports_rejected_values() {
        let id = Uuid::new_v4();
        let (set, rejected) =
            BookmarkSet::from_string_array(&[id.to_string(), "not-a-uuid".to_string()]);
        assert!(set.contains(id));
        assert_eq!(rejected, vec!["not-a-uuid".to_string()]);
        assert_eq!(set.to_string_array(), vec![id.to_string()]);
    }
}
