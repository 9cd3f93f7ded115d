//! Tag identifier to display label mapping.
//!
//! # Responsibility
//! - Hold the validated set of selectable filter tags.
//! - Report tags present on records but unknown to the mapping.
//!
//! # Invariants
//! - Tag ids match lowercase snake case.
//! - Labels are non-empty.
//! - Unknown tags are never given a fallback label.

use crate::model::scholarship::Scholarship;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").expect("valid tag id regex"));

const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("united_kingdom", "🇬🇧 United Kingdom"),
    ("united_states", "🇺🇸 United States"),
    ("china", "🇨🇳 China"),
    ("japan", "🇯🇵 Japan"),
    ("ireland", "🇮🇪 Ireland"),
    ("germany", "🇩🇪 Germany"),
    ("india", "🇮🇳 India"),
    ("africa", "🌍 Africa"),
    ("asia", "🌏 Asia"),
    ("latin_america", "🌎 Latin America"),
    ("global", "🌐 Global"),
    ("stem", "🧑‍🔬 STEM"),
    ("medical", "⚕️ Medical"),
    ("law", "⚖️ Law"),
    ("social_justice", "🗽 Social Justice"),
    ("peace_studies", "✌️ Peace Studies"),
    ("security_studies", "🛡 Security Studies"),
    ("financial", "💰 Financial"),
    ("food_security", "🥖 Food Security"),
    ("music", "🎵 Music"),
    ("language", "🗣 Language"),
];

/// Tag mapping validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCatalogError {
    InvalidTagId(String),
    EmptyLabel(String),
}

impl Display for TagCatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTagId(value) => {
                write!(f, "tag id must be lowercase snake case: `{value}`")
            }
            Self::EmptyLabel(tag) => write!(f, "tag `{tag}` has an empty label"),
        }
    }
}

impl Error for TagCatalogError {}

/// One selectable filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOption {
    pub id: String,
    pub label: String,
}

/// Validated tag id to label mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct TagCatalog {
    labels: BTreeMap<String, String>,
}

impl TagCatalog {
    /// Returns the built-in geographic and field-of-study tags.
    pub fn builtin() -> Self {
        Self {
            labels: BUILTIN_TAGS
                .iter()
                .map(|(id, label)| ((*id).to_string(), (*label).to_string()))
                .collect(),
        }
    }

    /// Builds a mapping from `(id, label)` pairs, rejecting invalid entries.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, TagCatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut labels = BTreeMap::new();
        for (id, label) in pairs {
            let id = id.into();
            let label = label.into();
            if !TAG_ID_RE.is_match(&id) {
                return Err(TagCatalogError::InvalidTagId(id));
            }
            if label.trim().is_empty() {
                return Err(TagCatalogError::EmptyLabel(id));
            }
            labels.insert(id, label.trim().to_string());
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.labels.contains_key(tag)
    }

    /// Returns the label for a known tag.
    pub fn label_for(&self, tag: &str) -> Option<&str> {
        self.labels.get(tag).map(String::as_str)
    }

    /// Returns filter-menu entries sorted by tag id.
    pub fn options(&self) -> Vec<TagOption> {
        self.labels
            .iter()
            .map(|(id, label)| TagOption {
                id: id.clone(),
                label: label.clone(),
            })
            .collect()
    }

    /// Returns tags on `scholarship` that this mapping does not know.
    pub fn unknown_tags<'a>(&self, scholarship: &'a Scholarship) -> Vec<&'a str> {
        scholarship
            .tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !self.contains(tag))
            .collect()
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<BTreeMap<String, String>> for TagCatalog {
    type Error = TagCatalogError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_pairs(value)
    }
}

impl From<TagCatalog> for BTreeMap<String, String> {
    fn from(value: TagCatalog) -> Self {
        value.labels
    }
}
