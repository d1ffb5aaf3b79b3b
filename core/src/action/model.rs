//! Action vocabulary, application context, and the text-edit output type.

use thiserror::Error;

use crate::condition::{transforms, ConditionParts};
use crate::schema::{ActionSpec, InsertPosition};
use crate::syntax::{closest_condition, field_context_with_fallback, NodeId, SyntaxTree};

/// Errors an action application can raise.
///
/// Most missing context is a silent no-op; this error is reserved for
/// actions the UI should never have offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Whole-condition replacement ran with no plain condition enclosing
    /// the cursor.
    #[error("No condition found at the cursor")]
    NoCondition,
}

/// A text replacement plus the cursor position that should follow it.
///
/// `from == to` is a pure insertion. Transforms leave `cursor` unset; the
/// host keeps its own selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start of the replaced range.
    pub from: usize,
    /// End of the replaced range.
    pub to: usize,
    /// Replacement text.
    pub insert: String,
    /// Cursor offset in the resulting document, when the action dictates
    /// one.
    pub cursor: Option<usize>,
}

impl TextEdit {
    /// Applies the edit to a document, returning the new text.
    #[must_use]
    pub fn apply(&self, doc: &str) -> String {
        let mut out = String::with_capacity(doc.len() - (self.to - self.from) + self.insert.len());
        out.push_str(&doc[..self.from]);
        out.push_str(&self.insert);
        out.push_str(&doc[self.to..]);
        out
    }
}

/// A condition rewrite. Application delegates to the pure functions in
/// [`crate::condition::transforms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Toggle the `-` prefix.
    Negate,
    /// Toggle the `!` prefix.
    Disable,
    /// Replace the field name.
    SetField(String),
    /// Replace the predicate text.
    SetPredicate(String),
    /// Wrap the predicate in a command call.
    WrapInCommand(String),
    /// Replace the whole condition with pre-built parts.
    Replace(ConditionParts),
}

impl Transform {
    /// Rewrites `parts` according to this transform.
    #[must_use]
    pub fn apply(&self, parts: &ConditionParts) -> ConditionParts {
        match self {
            Self::Negate => transforms::negate(parts),
            Self::Disable => transforms::disable(parts),
            Self::SetField(field) => transforms::set_field(parts, field),
            Self::SetPredicate(predicate) => transforms::set_predicate(parts, predicate),
            Self::WrapInCommand(name) => transforms::wrap_in_command(parts, name),
            Self::Replace(replacement) => replacement.clone(),
        }
    }
}

/// What a suggestion action does when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Rewrite the condition enclosing the cursor.
    Transform(Transform),
    /// Insert text at the cursor's node or at the end of the document.
    Insert {
        /// Text to insert.
        text: String,
        /// Where to put it.
        position: InsertPosition,
    },
    /// Append a condition after the current query, with spacing handled.
    Append {
        /// Text to append.
        value: String,
    },
    /// Replace or create the predicate from a template. The template may
    /// hold one `|` cursor marker.
    SetPredicate {
        /// Predicate template.
        template: String,
    },
}

impl From<ActionSpec> for ActionKind {
    fn from(spec: ActionSpec) -> Self {
        match spec {
            ActionSpec::SetPredicate { value } => Self::SetPredicate { template: value },
            ActionSpec::Insert { value, position } => Self::Insert {
                text: value,
                position,
            },
            ActionSpec::Append { value } => Self::Append { value },
            ActionSpec::InsertAtEnd { value } => Self::Insert {
                text: value,
                position: InsertPosition::End,
            },
        }
    }
}

/// One entry in the suggestion panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionAction {
    /// Stable identifier, e.g. `predicate-date-after()`.
    pub id: String,
    /// Label shown to the user.
    pub label: String,
    /// Secondary description line.
    pub description: Option<String>,
    /// What applying the action does.
    pub kind: ActionKind,
}

impl SuggestionAction {
    /// Creates an action without a description.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            kind,
        }
    }

    /// Sets the description line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Everything an action application needs to know about the cursor.
#[derive(Debug, Clone)]
pub struct ActionContext<'a> {
    /// Document text.
    pub doc: &'a str,
    /// Tree snapshot over `doc`.
    pub tree: &'a SyntaxTree,
    /// Node at the cursor.
    pub node: Option<NodeId>,
    /// Field name at the cursor, resolved through the whitespace fallback.
    pub field: Option<String>,
    /// Condition of any variant enclosing the cursor.
    pub condition: Option<NodeId>,
}

impl<'a> ActionContext<'a> {
    /// Resolves the full context at a cursor position.
    #[must_use]
    pub fn at(doc: &'a str, tree: &'a SyntaxTree, pos: usize) -> Self {
        let node = tree.resolve(pos);
        let field = field_context_with_fallback(tree, pos, node)
            .map(|field| tree.text(field, doc).to_owned());
        let condition = closest_condition(tree, node);
        Self {
            doc,
            tree,
            node: Some(node),
            field,
            condition,
        }
    }
}
