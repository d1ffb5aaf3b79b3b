//! Suggestion actions: what the editor offers and what applying one does.
//!
//! [`actions_for`] builds the suggestion list for a cursor position from
//! the field's configuration and the enclosing condition. [`apply_action`]
//! turns a picked suggestion into a [`TextEdit`]; nothing in this module
//! mutates the document.
//!
//! # Example
//!
//! ```
//! use dequel_core::action::{actions_for, apply_action, ActionContext};
//! use dequel_core::schema::SuggestionConfig;
//! use dequel_core::syntax::parse;
//!
//! let doc = "title:foo";
//! let tree = parse(doc);
//! let ctx = ActionContext::at(doc, &tree, 3);
//!
//! let actions = actions_for(&ctx, &SuggestionConfig::new());
//! let negate = actions.iter().find(|a| a.id == "negate").unwrap();
//! let edit = apply_action(&ctx, negate).unwrap().unwrap();
//! assert_eq!(edit.apply(doc), "-title:foo");
//! ```

mod engine;
mod model;
mod predicates;
mod providers;

pub use engine::apply_action;
pub use model::{ActionContext, ActionError, ActionKind, SuggestionAction, TextEdit, Transform};
pub use predicates::predicate_actions;
pub use providers::{actions_for, condition_modifiers, field_value_actions};
