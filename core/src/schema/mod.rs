//! Collection schemas, suggestion configuration, and the schema cache.
//!
//! Schemas describe what can be completed for a collection; suggestion
//! configs describe what the suggestion panel offers per field. Both arrive
//! as JSON through a [`SchemaFetcher`], and the [`SchemaCache`] makes sure
//! each collection is fetched at most once per editor session.

mod cache;
mod model;
pub mod suggestions;

pub use cache::{FetchError, SchemaCache, SchemaFetcher, StaticFetcher};
pub use model::{CompletionField, Schema};
pub use suggestions::{
    field_config, ActionSpec, FieldConfig, FieldType, InsertPosition, SuggestionConfig,
    ValueSuggestion,
};
