//! Tree navigation helpers shared by transforms, actions, and completion.
//!
//! All of these are read-only walks over a [`SyntaxTree`]. They signal "no
//! applicable context" with `None` and never fail.

use crate::syntax::tree::{NodeId, NodeKind, SyntaxTree};

/// Walks parent links and returns the nearest strict ancestor of `kind`.
#[must_use]
pub fn closest(tree: &SyntaxTree, node: NodeId, kind: NodeKind) -> Option<NodeId> {
    let mut current = tree.parent(node);
    while let Some(id) = current {
        if tree.kind(id) == kind {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// Returns `node` itself when it is a condition of any variant, otherwise
/// the nearest condition ancestor.
#[must_use]
pub fn closest_condition(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if tree.kind(id).is_condition() {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// Resolves the `Field` node the cursor's syntax node belongs to.
///
/// A `Field` is its own context; anything else (a value being typed, the
/// `:` separator, the condition itself) maps to the enclosing condition's
/// field. Bare whitespace has no enclosing condition and yields `None`.
#[must_use]
pub fn field_context(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    if tree.kind(node) == NodeKind::Field {
        return Some(node);
    }
    condition_field(tree, node)
}

fn condition_field(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let condition = closest_condition(tree, node)?;
    tree.child_of_kind(condition, NodeKind::Field)
}

/// [`field_context`] extended for cursors sitting in whitespace right after
/// a `:` with nothing typed yet.
///
/// When the direct classification fails and the cursor resolved to bare
/// whitespace (`Query` or the root), this scans backward one position at a
/// time: whitespace positions are skipped, a `:` or condition yields that
/// condition's field, and any other completed node ends the scan empty.
#[must_use]
pub fn field_context_with_fallback(
    tree: &SyntaxTree,
    pos: usize,
    node: NodeId,
) -> Option<NodeId> {
    if let Some(field) = field_context(tree, node) {
        return Some(field);
    }
    if !matches!(tree.kind(node), NodeKind::Query | NodeKind::QueryList) {
        return None;
    }
    let mut scan = pos;
    while scan > 0 {
        scan -= 1;
        let hit = tree.resolve(scan);
        let kind = tree.kind(hit);
        if matches!(kind, NodeKind::Query | NodeKind::QueryList) {
            continue;
        }
        if kind == NodeKind::Colon || kind.is_condition() {
            return condition_field(tree, hit);
        }
        return None;
    }
    None
}

/// Kind names from `node` up to the root, the node's own kind first.
#[must_use]
pub fn node_path(tree: &SyntaxTree, node: NodeId) -> Vec<&'static str> {
    let mut path = vec![tree.kind(node).name()];
    let mut current = tree.parent(node);
    while let Some(id) = current {
        path.push(tree.kind(id).name());
        current = tree.parent(id);
    }
    path
}
