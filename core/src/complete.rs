//! Autocompletion: field names, relationship paths, and enumerated values.
//!
//! The composer is position-driven. Past a condition's colon it offers the
//! field's enumerated values, on a field name it offers the schema's field
//! labels, and dotted names resolve through the schema cache so that
//! `author.` completes with the fields of the related collection.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::schema::{Schema, SchemaCache};
use crate::syntax::{closest_condition, NodeId, NodeKind, SyntaxTree};

/// One completion option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Text to complete to.
    pub label: String,
    /// `value` for enumerated values, otherwise the field's type.
    pub kind: String,
    /// Description shown next to the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// A completion list plus the start of the text it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    /// Byte offset where the replacement starts.
    pub from: usize,
    /// Options in schema order, unfiltered. The editor layer narrows them
    /// against the typed prefix.
    pub options: Vec<Completion>,
}

/// Computes completions at a cursor position.
///
/// # Arguments
///
/// * `doc` - Document text.
/// * `tree` - Tree snapshot over `doc`.
/// * `pos` - Cursor byte offset.
/// * `base` - Schema of the collection being queried.
/// * `cache` - Schema cache for resolving relationship paths.
///
/// # Returns
///
/// `None` when the position supports no completion at all. `Some` with an
/// empty option list when the position is completable but nothing matches
/// (an unresolvable path, or an empty schema).
pub async fn complete_at(
    doc: &str,
    tree: &SyntaxTree,
    pos: usize,
    base: Arc<Schema>,
    cache: &SchemaCache,
) -> Option<CompletionResult> {
    let node = tree.resolve(pos);

    if let Some(result) = value_completions(doc, tree, pos, node, &base) {
        return Some(result);
    }

    if tree.kind(node) != NodeKind::Field {
        return None;
    }

    let node_from = tree.range(node).from;
    let typed = &doc[node_from..pos];
    match typed.rfind('.') {
        Some(last_dot) => {
            // Everything before the last dot is a relationship path into
            // another collection's schema.
            let segments: Vec<&str> = typed[..last_dot].split('.').collect();
            trace!(?segments, "resolving relationship path for completion");
            let options = match cache.resolve_path(&segments, base).await {
                Some(schema) => field_options(&schema),
                None => Vec::new(),
            };
            Some(CompletionResult {
                from: node_from + last_dot + 1,
                options,
            })
        }
        None => Some(CompletionResult {
            from: node_from,
            options: field_options(&base),
        }),
    }
}

/// Enumerated-value options when the cursor sits past a condition's colon
/// and the schema lists values for the condition's field.
fn value_completions(
    doc: &str,
    tree: &SyntaxTree,
    pos: usize,
    node: NodeId,
    base: &Schema,
) -> Option<CompletionResult> {
    let condition = closest_condition(tree, node)?;
    let field = tree.child_of_kind(condition, NodeKind::Field)?;
    let colon = tree.child_of_kind(condition, NodeKind::Colon)?;
    // Strictly past the colon: sitting right on it still completes fields.
    if pos <= tree.range(colon).to {
        return None;
    }

    let values = base.values.get(tree.text(field, doc))?;
    if values.is_empty() {
        return None;
    }

    let options = values
        .iter()
        .map(|value| Completion {
            label: value.clone(),
            kind: "value".to_owned(),
            info: None,
        })
        .collect();
    Some(CompletionResult {
        from: trailing_word_start(doc, pos),
        options,
    })
}

fn field_options(schema: &Schema) -> Vec<Completion> {
    schema
        .fields
        .iter()
        .map(|field| Completion {
            label: field.label.clone(),
            kind: field.field_type.clone(),
            info: field.info.clone(),
        })
        .collect()
}

/// Start of the `[\w.]*` run ending at `pos`. Word bytes are ASCII, so the
/// walk never lands inside a multi-byte character.
fn trailing_word_start(doc: &str, pos: usize) -> usize {
    let bytes = doc.as_bytes();
    let mut start = pos;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    start
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompletionField, StaticFetcher};
    use crate::syntax::parse;

    fn base_schema() -> Schema {
        Schema::new(vec![
            CompletionField::new("id", "uuid"),
            CompletionField::new("title", "text").with_info("Product title"),
            CompletionField::new("status", "keyword"),
            CompletionField::new("author", "relationship").with_target("users"),
        ])
        .with_values("status", vec!["open".to_owned(), "closed".to_owned()])
    }

    fn users_schema() -> Schema {
        Schema::new(vec![
            CompletionField::new("name", "text"),
            CompletionField::new("email", "keyword"),
            CompletionField::new("company", "relationship").with_target("companies"),
        ])
    }

    fn companies_schema() -> Schema {
        Schema::new(vec![CompletionField::new("city", "text")])
    }

    fn test_fetcher() -> Arc<StaticFetcher> {
        Arc::new(
            StaticFetcher::new()
                .with_schema("users", users_schema())
                .with_schema("companies", companies_schema()),
        )
    }

    async fn complete(doc: &str, pos: usize) -> Option<CompletionResult> {
        let tree = parse(doc);
        let cache = SchemaCache::new(test_fetcher());
        complete_at(doc, &tree, pos, Arc::new(base_schema()), &cache).await
    }

    fn labels(result: &CompletionResult) -> Vec<&str> {
        result.options.iter().map(|o| o.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_field_completion_from_base_schema() {
        let result = complete("ti", 2).await.unwrap();
        assert_eq!(result.from, 0);
        assert_eq!(labels(&result), ["id", "title", "status", "author"]);
        assert_eq!(result.options[0].kind, "uuid");
        assert_eq!(result.options[1].info.as_deref(), Some("Product title"));
    }

    #[tokio::test]
    async fn test_field_completion_inside_full_condition() {
        // On the field name the value rule must not fire even though the
        // condition is complete.
        let result = complete("status:open", 3).await.unwrap();
        assert_eq!(result.from, 0);
        assert_eq!(result.options.len(), 4);
    }

    #[tokio::test]
    async fn test_value_completion_after_colon() {
        let result = complete("status:op", 9).await.unwrap();
        assert_eq!(result.from, 7);
        assert_eq!(labels(&result), ["open", "closed"]);
        assert_eq!(result.options[0].kind, "value");
        assert_eq!(result.options[0].info, None);
    }

    #[tokio::test]
    async fn test_value_completion_needs_text_past_colon() {
        // Sitting on the colon itself completes nothing yet.
        assert_eq!(complete("status:", 7).await, None);
        let result = complete("status:o", 8).await.unwrap();
        assert_eq!(result.from, 7);
        assert_eq!(labels(&result), ["open", "closed"]);
    }

    #[tokio::test]
    async fn test_value_completion_in_prefixed_condition() {
        let result = complete("-status:o", 9).await.unwrap();
        assert_eq!(result.from, 8);
        assert_eq!(labels(&result), ["open", "closed"]);
    }

    #[tokio::test]
    async fn test_value_completion_does_not_filter() {
        let result = complete("status:zz", 9).await.unwrap();
        assert_eq!(result.from, 7);
        assert_eq!(result.options.len(), 2);
    }

    #[tokio::test]
    async fn test_value_completion_needs_enumerated_values() {
        assert_eq!(complete("title:fo", 8).await, None);
    }

    #[tokio::test]
    async fn test_relationship_path_completion() {
        let result = complete("author.na", 9).await.unwrap();
        // Replacement starts right after the dot.
        assert_eq!(result.from, 7);
        assert_eq!(labels(&result), ["name", "email", "company"]);
        assert_eq!(result.options[2].kind, "relationship");
    }

    #[tokio::test]
    async fn test_completion_on_trailing_dot() {
        let result = complete("author.", 7).await.unwrap();
        assert_eq!(result.from, 7);
        assert_eq!(labels(&result), ["name", "email", "company"]);
    }

    #[tokio::test]
    async fn test_nested_path_resolves_each_hop() {
        let doc = "author.company.ci";
        let tree = parse(doc);
        let fetcher = test_fetcher();
        let cache = SchemaCache::new(fetcher.clone());

        let result = complete_at(doc, &tree, 17, Arc::new(base_schema()), &cache)
            .await
            .unwrap();
        assert_eq!(result.from, 15);
        assert_eq!(labels(&result), ["city"]);
        assert_eq!(fetcher.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_unresolvable_path_yields_empty_options() {
        let result = complete("missing.x", 9).await.unwrap();
        assert_eq!(result.from, 8);
        assert!(result.options.is_empty());
    }

    #[tokio::test]
    async fn test_non_relationship_hop_yields_empty_options() {
        let result = complete("title.x", 7).await.unwrap();
        assert_eq!(result.from, 6);
        assert!(result.options.is_empty());
    }

    #[tokio::test]
    async fn test_empty_base_schema_yields_empty_options() {
        let doc = "ti";
        let tree = parse(doc);
        let cache = SchemaCache::new(test_fetcher());
        let result = complete_at(doc, &tree, 2, Arc::new(Schema::default()), &cache)
            .await
            .unwrap();
        assert_eq!(result.from, 0);
        assert!(result.options.is_empty());
    }

    #[tokio::test]
    async fn test_no_completion_outside_fields_and_values() {
        assert_eq!(complete("", 0).await, None);
        assert_eq!(complete("title:foo ", 10).await, None);
        // A regex predicate is past the colon but its field has no values.
        assert_eq!(complete("name:/x/", 7).await, None);
    }
}
