//! Dequel Core Library
//!
//! This crate contains the editor-independent core of the Dequel query
//! language: parsing, condition transforms, suggestion actions, schema
//! caching, and autocompletion.
//!
//! # Modules
//!
//! - [`syntax`] - Lexing, parsing, and tree navigation
//! - [`condition`] - Condition model and pure transforms
//! - [`action`] - Suggestion actions and the edits they produce
//! - [`schema`] - Schema models, wire formats, and the async cache
//! - [`complete`] - Autocompletion composer
//!
//! # Example
//!
//! ```
//! use dequel_core::action::{apply_action, ActionContext, ActionKind, SuggestionAction, Transform};
//! use dequel_core::syntax::parse;
//!
//! let doc = "status:open";
//! let tree = parse(doc);
//! let ctx = ActionContext::at(doc, &tree, 8);
//!
//! let negate = SuggestionAction::new("negate", "-", ActionKind::Transform(Transform::Negate));
//! let edit = apply_action(&ctx, &negate).unwrap().unwrap();
//! assert_eq!(edit.apply(doc), "-status:open");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod complete;
pub mod condition;
pub mod schema;
pub mod syntax;

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
