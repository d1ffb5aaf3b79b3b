//! Serde models for collection schemas.
//!
//! A [`Schema`] is what the editor knows about one collection: the fields
//! that can be completed and, per field, optional enumerable values. The
//! JSON shapes match the schema endpoint's responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One completable field of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionField {
    /// Field name as typed in queries.
    pub label: String,

    /// Field type. Free-form on the wire; only `"relationship"` has
    /// structural meaning (the field links to another collection).
    #[serde(rename = "type")]
    pub field_type: String,

    /// Short human-readable description, shown next to completions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    /// Collection a relationship field points at. Dotted paths continue
    /// through this collection's schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Relationship cardinality, e.g. `"one"` or `"many"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
}

impl CompletionField {
    /// Creates a field with just a label and type.
    #[must_use]
    pub fn new(label: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: field_type.into(),
            info: None,
            target: None,
            cardinality: None,
        }
    }

    /// Sets the description text.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Sets the relationship target collection.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// The target collection, when this field is a usable relationship.
    #[must_use]
    pub fn relationship_target(&self) -> Option<&str> {
        if self.field_type == "relationship" {
            self.target.as_deref()
        } else {
            None
        }
    }
}

/// Everything the editor knows about one collection.
///
/// The empty schema (no fields, no values) doubles as the fallback when a
/// fetch fails: completion degrades to nothing instead of erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Completable fields, in the order the backend returns them.
    #[serde(default)]
    pub fields: Vec<CompletionField>,

    /// Enumerable values per field name, for value-position completion.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub values: HashMap<String, Vec<String>>,
}

impl Schema {
    /// Creates a schema from its fields, with no enumerable values.
    #[must_use]
    pub fn new(fields: Vec<CompletionField>) -> Self {
        Self {
            fields,
            values: HashMap::new(),
        }
    }

    /// Adds enumerable values for one field.
    #[must_use]
    pub fn with_values(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.values.insert(field.into(), values);
        self
    }

    /// Looks up a field by label.
    #[must_use]
    pub fn field(&self, label: &str) -> Option<&CompletionField> {
        self.fields.iter().find(|field| field.label == label)
    }
}
