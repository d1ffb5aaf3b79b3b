//! Syntax diagnostics over a parsed tree.

use serde::Serialize;

use crate::syntax::tree::{NodeKind, SyntaxTree};

/// A reported problem in the document, with a half-open byte range.
///
/// Zero-width diagnostics point at something missing, such as a condition
/// typed only up to its `:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Start of the offending range.
    pub from: usize,
    /// End of the offending range.
    pub to: usize,
    /// Human-readable description.
    pub message: String,
}

/// Collects one diagnostic per `Error` node in the tree, in document order.
///
/// # Examples
///
/// ```
/// use dequel_core::syntax::{diagnostics, parse};
///
/// assert!(diagnostics(&parse("status:open")).is_empty());
/// assert_eq!(diagnostics(&parse("status:")).len(), 1);
/// ```
#[must_use]
pub fn diagnostics(tree: &SyntaxTree) -> Vec<Diagnostic> {
    tree.preorder()
        .filter(|&id| tree.kind(id) == NodeKind::Error)
        .map(|id| {
            let range = tree.range(id);
            Diagnostic {
                from: range.from,
                to: range.to,
                message: "Syntax error".to_owned(),
            }
        })
        .collect()
}
