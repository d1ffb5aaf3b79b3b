//! The three-part condition model and its (de)serialization against a tree.

use std::fmt;

use serde::Serialize;

use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// The optional marker in front of a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Prefix {
    /// No prefix; the condition filters normally.
    #[default]
    #[serde(rename = "")]
    None,
    /// `-`: results matching the condition are excluded.
    #[serde(rename = "-")]
    Exclude,
    /// `!`: the condition is kept in the query but not executed.
    #[serde(rename = "!")]
    Ignore,
}

impl Prefix {
    /// The literal spelling of the prefix.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Exclude => "-",
            Self::Ignore => "!",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition split into its editable parts.
///
/// All transforms operate on this model; the serialized form is always
/// `prefix + field + ":" + predicate`. For a syntactically complete
/// condition node, parsing and re-serializing reproduces the document slice
/// byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionParts {
    /// The condition's prefix state.
    pub prefix: Prefix,
    /// Field name, possibly a dotted relationship path. Empty when the
    /// condition has no field yet.
    pub field: String,
    /// Predicate text exactly as written, parentheses and quotes included.
    /// Empty when nothing is typed after the `:`.
    pub predicate: String,
    /// The condition node these parts were sliced from. Only meaningful
    /// against the tree snapshot it came from.
    #[serde(skip)]
    pub node: Option<NodeId>,
}

impl ConditionParts {
    /// Creates parts out of thin air, with no originating node.
    #[must_use]
    pub fn new(prefix: Prefix, field: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            prefix,
            field: field.into(),
            predicate: predicate.into(),
            node: None,
        }
    }
}

impl fmt::Display for ConditionParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_condition(self))
    }
}

/// Splits a condition node into its parts.
///
/// The prefix comes from the node kind; field and predicate are sliced from
/// the node's children and default to `""` while the user is mid-typing.
/// `node` should be one of the three condition kinds; for anything else the
/// parts come back empty.
///
/// # Arguments
///
/// * `tree` - The tree snapshot holding `node`
/// * `node` - The condition node to split
/// * `doc` - The text `tree` was parsed from
#[must_use]
pub fn parse_condition(tree: &SyntaxTree, node: NodeId, doc: &str) -> ConditionParts {
    let prefix = match tree.kind(node) {
        NodeKind::ExcludeCondition => Prefix::Exclude,
        NodeKind::IgnoredCondition => Prefix::Ignore,
        _ => Prefix::None,
    };
    let field = tree
        .child_of_kind(node, NodeKind::Field)
        .map(|field| tree.text(field, doc).to_owned())
        .unwrap_or_default();
    let predicate = tree
        .child_of_kind(node, NodeKind::Predicate)
        .map(|predicate| tree.text(predicate, doc).to_owned())
        .unwrap_or_default();
    ConditionParts {
        prefix,
        field,
        predicate,
        node: Some(node),
    }
}

/// Renders parts back to source text: `prefix + field + ":" + predicate`.
#[must_use]
pub fn serialize_condition(parts: &ConditionParts) -> String {
    format!("{}{}:{}", parts.prefix, parts.field, parts.predicate)
}
