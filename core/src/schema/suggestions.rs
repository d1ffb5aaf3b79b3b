//! Serde models for suggestion configuration.
//!
//! The suggestions endpoint returns a map from field name (or the `"*"`
//! wildcard) to a [`FieldConfig`]: a display title, an optional field type
//! driving predicate templates, and configured values with the action to
//! run when one is picked.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Suggestion configuration for a whole collection, keyed by field name or
/// `"*"`.
pub type SuggestionConfig = HashMap<String, FieldConfig>;

/// Looks up the config for a field, falling back to the wildcard entry.
#[must_use]
pub fn field_config<'c>(
    config: &'c SuggestionConfig,
    field: Option<&str>,
) -> Option<&'c FieldConfig> {
    match field {
        Some(name) => config.get(name).or_else(|| config.get("*")),
        None => config.get("*"),
    }
}

/// The broad type of a field, driving which predicate templates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text; supports substring and affix matching.
    Text,
    /// Exact-match token.
    Keyword,
    /// Identifier; supports one-of matching.
    Uuid,
    /// Date; supports before/after/between.
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Uuid => "uuid",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// Where an insert action places its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    /// At the node under the cursor (start of the document when the cursor
    /// is nowhere).
    #[default]
    Cursor,
    /// At the end of the document.
    End,
}

/// Wire shape of an action attached to a configured suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionSpec {
    /// Replace the current condition's predicate with `value`.
    #[serde(rename = "setPredicate")]
    SetPredicate {
        /// Predicate template, optionally holding one `|` cursor marker.
        value: String,
    },

    /// Insert `value` at the given position.
    #[serde(rename = "insert")]
    Insert {
        /// Text to insert.
        value: String,

        /// Placement, defaulting to the cursor.
        #[serde(default)]
        position: InsertPosition,
    },

    /// Append `value` after the current query.
    #[serde(rename = "append")]
    Append {
        /// Text to append.
        value: String,
    },

    /// Legacy spelling of an insert at the end of the document.
    #[serde(rename = "insert-at-end")]
    InsertAtEnd {
        /// Text to insert.
        value: String,
    },
}

/// One configured value suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSuggestion {
    /// Text shown in the suggestion list.
    pub label: String,

    /// Secondary description line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// What picking the suggestion does.
    pub action: ActionSpec,
}

/// Suggestion configuration for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Heading shown above the field's suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description shown under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Field type; present when predicate templates should be offered.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Configured value suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ValueSuggestion>,
}
