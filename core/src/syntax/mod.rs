//! Query language grammar, parsing, and tree access.
//!
//! Queries are lists of `field:predicate` conditions separated by spaces.
//! A condition can be prefixed with `-` (exclude) or `!` (ignore), fields
//! can be dotted relationship paths, and predicates are plain values,
//! quoted strings, regexes, or command calls.
//!
//! # Supported Syntax
//!
//! ```text
//! status:open -archived:true !assignee:"Jane Doe"
//! author.name:/^smith/i created_at:between(2024, 2025)
//! # comments run to the end of the line
//! ```
//!
//! # Example
//!
//! ```
//! use dequel_core::syntax::{closest_condition, parse, NodeKind};
//!
//! let doc = "status:open";
//! let tree = parse(doc);
//! let node = tree.resolve(9);
//! let condition = closest_condition(&tree, node).unwrap();
//! assert_eq!(tree.kind(condition), NodeKind::Condition);
//! ```

mod diagnostics;
mod lexer;
mod navigate;
mod parser;
mod tree;

pub use diagnostics::{diagnostics, Diagnostic};
pub use navigate::{
    closest, closest_condition, field_context, field_context_with_fallback, node_path,
};
pub use parser::parse;
pub use tree::{NodeId, NodeKind, Preorder, SyntaxTree, TextRange};
