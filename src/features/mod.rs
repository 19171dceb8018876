//! Column Features
//!
//! Reusable column behaviors attached to record classes:
//! - Date created / date updated: auto-populated timestamps
//! - Email / link: format validation, link preparation for display
//! - Random: unique random-string generation for new records
//!
//! Configuration records each column's feature in a [`FeatureStore`] and
//! registers the callbacks below with the hook registry.

mod configure;
pub mod email;
pub mod inspect;
pub mod link;
pub mod random;
pub mod timestamps;

pub use email::ValidateEmailColumns;
pub use inspect::InspectColumn;
pub use link::{PrepareLinkColumn, ValidateLinkColumns};
pub use random::SetRandomStrings;
pub use timestamps::{SetDateCreated, SetDateUpdated};

use serde::Serialize;
use std::collections::HashMap;

use crate::random::Charset;
use crate::schema::{DataType, FeatureTag};

/// Charset and length of a random-string column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RandomColumnSpec {
    pub charset: Charset,
    pub length: usize,
}

/// Feature configured on a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum FeatureKind {
    DateCreated,
    DateUpdated,
    Email,
    Link,
    Random(RandomColumnSpec),
}

const DATE_TYPES: &[DataType] = &[DataType::Date, DataType::Time, DataType::Timestamp];
const STRING_TYPES: &[DataType] = &[DataType::Varchar, DataType::Char, DataType::Text];

impl FeatureKind {
    pub fn tag(&self) -> FeatureTag {
        match self {
            FeatureKind::DateCreated => FeatureTag::DateCreated,
            FeatureKind::DateUpdated => FeatureTag::DateUpdated,
            FeatureKind::Email => FeatureTag::Email,
            FeatureKind::Link => FeatureTag::Link,
            FeatureKind::Random(_) => FeatureTag::Random,
        }
    }

    /// Column types the feature can be applied to
    pub fn allowed_types(&self) -> &'static [DataType] {
        match self {
            FeatureKind::DateCreated | FeatureKind::DateUpdated => DATE_TYPES,
            _ => STRING_TYPES,
        }
    }

    /// Noun phrase used in configuration errors, e.g. "an email"
    pub fn label(&self) -> &'static str {
        label_for(self.tag())
    }
}

pub(crate) fn label_for(tag: FeatureTag) -> &'static str {
    match tag {
        FeatureTag::DateCreated => "a date created",
        FeatureTag::DateUpdated => "a date updated",
        FeatureTag::Email => "an email",
        FeatureTag::Link => "a link",
        FeatureTag::Random => "a random string",
    }
}

/// A configured (class, column, feature) triple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRegistration {
    pub class: String,
    pub column: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

/// Per-class, per-column feature settings
///
/// Columns keep the order they were first configured in; callbacks walk
/// them in that order.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    classes: HashMap<String, Vec<(String, FeatureKind)>>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the column's feature, overwriting earlier settings for it in place
    pub(crate) fn record(&mut self, class: &str, column: &str, kind: FeatureKind) {
        let columns = self.classes.entry(class.to_string()).or_default();
        match columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = kind,
            None => columns.push((column.to_string(), kind)),
        }
    }

    pub fn feature(&self, class: &str, column: &str) -> Option<&FeatureKind> {
        self.classes
            .get(class)?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| kind)
    }

    /// Columns of a class carrying the given feature, in configuration order
    pub fn columns_with(&self, class: &str, tag: FeatureTag) -> Vec<&str> {
        self.classes
            .get(class)
            .map(|columns| {
                columns
                    .iter()
                    .filter(|(_, kind)| kind.tag() == tag)
                    .map(|(column, _)| column.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Random columns of a class with their settings
    pub fn random_columns(&self, class: &str) -> Vec<(&str, RandomColumnSpec)> {
        self.classes
            .get(class)
            .map(|columns| {
                columns
                    .iter()
                    .filter_map(|(column, kind)| match kind {
                        FeatureKind::Random(spec) => Some((column.as_str(), *spec)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every registration, ordered by class name, then by configuration order
    pub fn registrations(&self) -> Vec<FeatureRegistration> {
        let mut classes: Vec<&String> = self.classes.keys().collect();
        classes.sort();
        classes
            .into_iter()
            .flat_map(|class| {
                self.classes[class]
                    .iter()
                    .map(move |(column, kind)| FeatureRegistration {
                        class: class.clone(),
                        column: column.clone(),
                        kind: *kind,
                    })
            })
            .collect()
    }
}
