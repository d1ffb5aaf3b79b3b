//! Condition model and transforms.
//!
//! A condition is `prefix + field + ":" + predicate`. This module splits
//! condition nodes into [`ConditionParts`], serializes parts back to source
//! text, and rewrites them with the pure functions in [`transforms`].
//!
//! # Example
//!
//! ```
//! use dequel_core::condition::{parse_condition, serialize_condition, transforms};
//! use dequel_core::syntax::{closest_condition, parse};
//!
//! let doc = "title:foo";
//! let tree = parse(doc);
//! let condition = closest_condition(&tree, tree.resolve(3)).unwrap();
//! let parts = parse_condition(&tree, condition, doc);
//! assert_eq!(serialize_condition(&transforms::negate(&parts)), "-title:foo");
//! ```

mod model;
pub mod transforms;

pub use model::{parse_condition, serialize_condition, ConditionParts, Prefix};
