//! Arena-backed concrete syntax tree.
//!
//! A parse produces a [`SyntaxTree`]: a flat arena of nodes indexed by
//! [`NodeId`], with parent and child links stored as indices. Trees never
//! change after parsing; every edit re-parses the document and yields a new
//! snapshot, so a `NodeId` is only meaningful against the tree it came from.
//! The tree does not own the document text — functions that need text take
//! the source `&str` alongside it.

use std::fmt;

/// A half-open byte range `[from, to)` into the parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    /// Inclusive start offset.
    pub from: usize,
    /// Exclusive end offset.
    pub to: usize,
}

impl TextRange {
    /// Creates a new range. `from` must not exceed `to`.
    #[must_use]
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "range start {from} is past end {to}");
        Self { from, to }
    }

    /// Length of the range in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Whether the range covers zero bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

/// The closed vocabulary of node kinds a parse can produce.
///
/// Structural kinds (`QueryList` through `Argument`) group their children;
/// the remaining kinds are leaf tokens. Punctuation other than the `:`
/// separator (condition prefixes, parentheses, commas) is not materialized
/// as nodes; the ranges of the enclosing nodes still cover those characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root node, spanning the whole document.
    QueryList,
    /// One query: conditions separated by spaces or tabs.
    Query,
    /// A plain `field:predicate` condition.
    Condition,
    /// A condition prefixed with `-` (excluded from results).
    ExcludeCondition,
    /// A condition prefixed with `!` (ignored when running the query).
    IgnoredCondition,
    /// The field name of a condition, possibly dot-chained.
    Field,
    /// The `:` separating field and predicate.
    Colon,
    /// The right-hand side of a condition.
    Predicate,
    /// A literal predicate value (identifier, number, or string).
    Value,
    /// A command-call predicate: `name(arg, ...)`.
    Command,
    /// One argument of a command call.
    Argument,
    /// A regular-expression predicate: `/…/flags`.
    Regex,
    /// A bare identifier token.
    Identifier,
    /// A digit-run token.
    Number,
    /// A double-quoted string token.
    String,
    /// Input the parser could not fit into the grammar.
    Error,
}

impl NodeKind {
    /// The node kind's name, as it appears in tree dumps and node paths.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryList => "QueryList",
            Self::Query => "Query",
            Self::Condition => "Condition",
            Self::ExcludeCondition => "ExcludeCondition",
            Self::IgnoredCondition => "IgnoredCondition",
            Self::Field => "Field",
            Self::Colon => "Colon",
            Self::Predicate => "Predicate",
            Self::Value => "Value",
            Self::Command => "Command",
            Self::Argument => "Argument",
            Self::Regex => "Regex",
            Self::Identifier => "Identifier",
            Self::Number => "Number",
            Self::String => "String",
            Self::Error => "Error",
        }
    }

    /// Whether this kind is one of the three condition variants.
    #[must_use]
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            Self::Condition | Self::ExcludeCondition | Self::IgnoredCondition
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a node within its [`SyntaxTree`].
///
/// Ids are only valid for the tree that produced them and become meaningless
/// once the document is re-parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    range: TextRange,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable concrete syntax tree over one document snapshot.
///
/// # Example
///
/// ```
/// use dequel_core::syntax::{parse, NodeKind};
///
/// let doc = "title:foo";
/// let tree = parse(doc);
/// let node = tree.resolve(8);
/// assert_eq!(tree.kind(node), NodeKind::Identifier);
/// assert_eq!(tree.text(node, doc), "foo");
/// ```
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Creates a tree containing only the root, spanning `[0, len)`.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::QueryList,
                range: TextRange::new(0, len),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node under `parent` and returns its id.
    pub(crate) fn push(
        &mut self,
        kind: NodeKind,
        range: TextRange,
        parent: NodeId,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(NodeData {
            kind,
            range,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Extends a node's range so it ends at `to`. Used while the parser
    /// closes structural nodes around their children.
    pub(crate) fn extend_to(&mut self, id: NodeId, to: usize) {
        let range = &mut self.nodes[id.index()].range;
        if to > range.to {
            range.to = to;
        }
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// The root node (always a [`NodeKind::QueryList`]).
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// The byte range a node covers.
    #[must_use]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    /// The parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The first child of `id` with the given kind.
    #[must_use]
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// Slices the text a node covers out of the document it was parsed from.
    ///
    /// `doc` must be the exact text this tree was built over.
    #[must_use]
    pub fn text<'d>(&self, id: NodeId, doc: &'d str) -> &'d str {
        let range = self.range(id);
        &doc[range.from..range.to]
    }

    /// Resolves the innermost node at a cursor position, preferring the node
    /// that ends at the position over the one that starts at it (left bias:
    /// a node matches when `from < pos && pos <= to`). Positions in bare
    /// whitespace resolve to the enclosing [`NodeKind::Query`] or the root.
    #[must_use]
    pub fn resolve(&self, pos: usize) -> NodeId {
        let mut current = self.root();
        loop {
            let next = self.children(current).iter().copied().find(|&child| {
                let range = self.range(child);
                range.from < pos && pos <= range.to
            });
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Iterates over all nodes in preorder (parents before children).
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Renders an indented view of the tree with node kinds, ranges, and
    /// leaf text. Intended for debugging and CLI inspection.
    #[must_use]
    pub fn dump(&self, doc: &str) -> String {
        let mut out = String::new();
        self.dump_node(self.root(), doc, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, doc: &str, depth: usize, out: &mut String) {
        use fmt::Write;

        let node = self.node(id);
        let _ = write!(out, "{}{} {}", "  ".repeat(depth), node.kind, node.range);
        if node.children.is_empty() && !node.range.is_empty() {
            let _ = write!(out, " {:?}", self.text(id, doc));
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_node(child, doc, depth + 1, out);
        }
    }
}

/// Preorder iterator over a tree's nodes. Created by [`SyntaxTree::preorder`].
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
