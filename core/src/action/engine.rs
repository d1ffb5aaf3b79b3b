//! Turns a [`SuggestionAction`] plus a cursor context into a [`TextEdit`].
//!
//! Every application is pure: nothing here touches the document, the
//! caller applies (or discards) the returned edit. Missing context is a
//! silent `Ok(None)` except for whole-condition replacement, which is
//! only offered when a condition exists and therefore fails loudly.

use crate::action::model::{
    ActionContext, ActionError, ActionKind, SuggestionAction, TextEdit, Transform,
};
use crate::condition::{parse_condition, serialize_condition};
use crate::schema::InsertPosition;
use crate::syntax::{closest, NodeId, NodeKind, SyntaxTree};

/// Applies `action` at the cursor described by `ctx`.
///
/// # Arguments
///
/// * `ctx` - Cursor context built with [`ActionContext::at`].
/// * `action` - The suggestion the user picked.
///
/// # Returns
///
/// `Ok(Some(edit))` when the action produced an edit, `Ok(None)` when the
/// context cannot support it (for example appending with no tree node at
/// the cursor).
///
/// # Errors
///
/// [`ActionError::NoCondition`] when a replacement transform runs outside
/// any plain condition.
pub fn apply_action(
    ctx: &ActionContext<'_>,
    action: &SuggestionAction,
) -> Result<Option<TextEdit>, ActionError> {
    match &action.kind {
        ActionKind::Transform(transform) => apply_transform(ctx, transform),
        ActionKind::Insert { text, position } => Ok(Some(apply_insert(ctx, text, *position))),
        ActionKind::Append { value } => Ok(apply_append(ctx, value)),
        ActionKind::SetPredicate { template } => Ok(apply_set_predicate(ctx, template)),
    }
}

fn apply_transform(
    ctx: &ActionContext<'_>,
    transform: &Transform,
) -> Result<Option<TextEdit>, ActionError> {
    let target = if matches!(transform, Transform::Replace(_)) {
        // Replacement insists on an unprefixed condition; excluded and
        // ignored conditions are deliberately left alone.
        ctx.node
            .and_then(|node| closest(ctx.tree, node, NodeKind::Condition))
            .ok_or(ActionError::NoCondition)?
    } else {
        match ctx.condition {
            Some(condition) => condition,
            None => return Ok(None),
        }
    };

    let parts = parse_condition(ctx.tree, target, ctx.doc);
    let range = ctx.tree.range(target);
    Ok(Some(TextEdit {
        from: range.from,
        to: range.to,
        insert: serialize_condition(&transform.apply(&parts)),
        cursor: None,
    }))
}

fn apply_insert(ctx: &ActionContext<'_>, text: &str, position: InsertPosition) -> TextEdit {
    let from = match position {
        InsertPosition::Cursor => ctx.node.map_or(0, |node| ctx.tree.range(node).from),
        InsertPosition::End => ctx.doc.len(),
    };
    TextEdit {
        from,
        to: from,
        insert: text.to_owned(),
        cursor: Some(from + text.len()),
    }
}

fn apply_append(ctx: &ActionContext<'_>, value: &str) -> Option<TextEdit> {
    let node = ctx.node?;
    let query = closest(ctx.tree, node, NodeKind::Query).unwrap_or(node);

    // Spacing probes at the cursor's node, not the insertion point. At the
    // end of the document there is no character, which counts as blank.
    let probe = ctx.tree.range(node).to;
    let needs_space = ctx.doc[probe..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace());
    let insert = if needs_space {
        format!(" {value}")
    } else {
        value.to_owned()
    };

    let at = ctx.tree.range(query).to;
    let cursor = at + insert.len();
    Some(TextEdit {
        from: at,
        to: at,
        insert,
        cursor: Some(cursor),
    })
}

fn apply_set_predicate(ctx: &ActionContext<'_>, template: &str) -> Option<TextEdit> {
    let marker = template.find('|');
    let clean = match marker {
        Some(at) => format!("{}{}", &template[..at], &template[at + 1..]),
        None => template.to_owned(),
    };

    // The cursor may sit inside the predicate (walk up) or elsewhere in
    // the condition, like the field or colon (walk down from the
    // condition).
    let predicate = ctx
        .node
        .and_then(|node| closest(ctx.tree, node, NodeKind::Predicate))
        .or_else(|| {
            ctx.condition
                .and_then(|condition| ctx.tree.child_of_kind(condition, NodeKind::Predicate))
        });

    let Some(predicate) = predicate else {
        // Nothing after the colon yet: grow the condition instead of
        // replacing.
        let at = match (ctx.condition, ctx.node) {
            (Some(condition), _) => ctx.tree.range(condition).to,
            (None, Some(node)) => ctx.tree.range(node).to,
            (None, None) => return None,
        };
        let cursor = at + marker.unwrap_or(clean.len());
        return Some(TextEdit {
            from: at,
            to: at,
            insert: clean,
            cursor: Some(cursor),
        });
    };

    let range = ctx.tree.range(predicate);
    let preserved = marker.and_then(|at| {
        // Only command templates with an empty argument slot carry the old
        // argument over.
        if !(template[..at].contains('(') && template[at + 1..].contains(')')) {
            return None;
        }
        let prior = prior_argument(ctx.tree, predicate, ctx.doc)?;
        let slot_quoted = template[..at].ends_with('"') && template[at + 1..].starts_with('"');
        Some((at, prior.for_slot(slot_quoted).to_owned()))
    });

    let edit = if let Some((at, kept)) = preserved {
        let insert = format!("{}{kept}{}", &clean[..at], &clean[at..]);
        let cursor = range.from + at + kept.len();
        TextEdit {
            from: range.from,
            to: range.to,
            insert,
            cursor: Some(cursor),
        }
    } else {
        let cursor = range.from + marker.unwrap_or(clean.len());
        TextEdit {
            from: range.from,
            to: range.to,
            insert: clean,
            cursor: Some(cursor),
        }
    };
    Some(edit)
}

/// A predicate argument worth carrying into a new template.
struct PriorArgument {
    /// The argument exactly as written, quotes included.
    raw: String,
    /// Whether it was a quoted string.
    quoted: bool,
}

impl PriorArgument {
    /// The text to splice into the template slot. Quotes are stripped only
    /// when both sides are quoted; a bare token keeps its raw form either
    /// way.
    fn for_slot(&self, slot_quoted: bool) -> &str {
        if self.quoted && slot_quoted {
            &self.raw[1..self.raw.len() - 1]
        } else {
            &self.raw
        }
    }
}

fn prior_argument(tree: &SyntaxTree, predicate: NodeId, doc: &str) -> Option<PriorArgument> {
    let inner = tree.children(predicate).first().copied()?;
    match tree.kind(inner) {
        NodeKind::Value => leaf_argument(tree, inner, doc),
        NodeKind::Command => {
            let argument = tree.child_of_kind(inner, NodeKind::Argument)?;
            leaf_argument(tree, argument, doc)
        }
        _ => None,
    }
}

fn leaf_argument(tree: &SyntaxTree, wrapper: NodeId, doc: &str) -> Option<PriorArgument> {
    let leaf = tree.children(wrapper).first().copied()?;
    let raw = tree.text(leaf, doc).to_owned();
    match tree.kind(leaf) {
        NodeKind::String => Some(PriorArgument { raw, quoted: true }),
        NodeKind::Identifier | NodeKind::Number => Some(PriorArgument { raw, quoted: false }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionParts, Prefix};
    use crate::syntax::parse;

    fn transform_action(transform: Transform) -> SuggestionAction {
        SuggestionAction::new("t", "t", ActionKind::Transform(transform))
    }

    fn run(doc: &str, pos: usize, action: &SuggestionAction) -> Option<TextEdit> {
        let tree = parse(doc);
        let ctx = ActionContext::at(doc, &tree, pos);
        apply_action(&ctx, action).unwrap()
    }

    fn run_text(doc: &str, pos: usize, action: &SuggestionAction) -> String {
        run(doc, pos, action).expect("expected an edit").apply(doc)
    }

    // ==================== transforms ====================

    #[test]
    fn test_negate_adds_and_removes_prefix() {
        let action = transform_action(Transform::Negate);
        assert_eq!(run_text("title:foo", 3, &action), "-title:foo");
        assert_eq!(run_text("-title:foo", 4, &action), "title:foo");
        assert_eq!(run_text("!title:foo", 4, &action), "-title:foo");
    }

    #[test]
    fn test_disable_adds_and_removes_prefix() {
        let action = transform_action(Transform::Disable);
        assert_eq!(run_text("title:foo", 3, &action), "!title:foo");
        assert_eq!(run_text("!title:foo", 4, &action), "title:foo");
        assert_eq!(run_text("-title:foo", 4, &action), "!title:foo");
    }

    #[test]
    fn test_transform_with_cursor_on_prefix() {
        // Position 1 resolves to the condition node itself, not a leaf.
        let action = transform_action(Transform::Negate);
        assert_eq!(run_text("-title:foo", 1, &action), "title:foo");
    }

    #[test]
    fn test_transform_replaces_only_its_condition() {
        let action = transform_action(Transform::Negate);
        assert_eq!(
            run_text("title:foo status:open", 18, &action),
            "title:foo -status:open"
        );
    }

    #[test]
    fn test_transform_without_condition_is_noop() {
        let action = transform_action(Transform::Negate);
        assert_eq!(run("", 0, &action), None);
        assert_eq!(run("title:foo ", 10, &action), None);
    }

    #[test]
    fn test_transform_leaves_cursor_alone() {
        let action = transform_action(Transform::SetField("name".to_owned()));
        let edit = run("title:foo", 3, &action).unwrap();
        assert_eq!(edit.cursor, None);
        assert_eq!(edit.apply("title:foo"), "name:foo");
    }

    #[test]
    fn test_replace_swaps_whole_condition() {
        let replacement = ConditionParts::new(Prefix::None, "status", "open");
        let action = transform_action(Transform::Replace(replacement));
        assert_eq!(run_text("title:foo", 3, &action), "status:open");
    }

    #[test]
    fn test_replace_fails_on_prefixed_condition() {
        let replacement = ConditionParts::new(Prefix::None, "status", "open");
        let action = transform_action(Transform::Replace(replacement));
        let doc = "-title:foo";
        let tree = parse(doc);
        let ctx = ActionContext::at(doc, &tree, 4);
        assert_eq!(apply_action(&ctx, &action), Err(ActionError::NoCondition));
    }

    #[test]
    fn test_replace_fails_outside_any_condition() {
        let replacement = ConditionParts::new(Prefix::None, "status", "open");
        let action = transform_action(Transform::Replace(replacement));
        let tree = parse("");
        let ctx = ActionContext::at("", &tree, 0);
        assert_eq!(apply_action(&ctx, &action), Err(ActionError::NoCondition));
    }

    // ==================== insert ====================

    fn insert_action(text: &str, position: InsertPosition) -> SuggestionAction {
        SuggestionAction::new(
            "i",
            "i",
            ActionKind::Insert {
                text: text.to_owned(),
                position,
            },
        )
    }

    #[test]
    fn test_insert_at_cursor_node_start() {
        let action = insert_action("bar", InsertPosition::Cursor);
        let edit = run("title:foo", 9, &action).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:barfoo");
        assert_eq!(edit.cursor, Some(9));
    }

    #[test]
    fn test_insert_into_empty_document() {
        let action = insert_action("title:", InsertPosition::Cursor);
        let edit = run("", 0, &action).unwrap();
        assert_eq!(edit.apply(""), "title:");
        assert_eq!(edit.cursor, Some(6));
    }

    #[test]
    fn test_insert_between_conditions_lands_on_query_start() {
        // The gap between two conditions resolves to the query node, so
        // the insertion point is the query's start.
        let action = insert_action("x:y ", InsertPosition::Cursor);
        let edit = run("title:foo region:bar", 10, &action).unwrap();
        assert_eq!(edit.from, 0);
        assert_eq!(edit.apply("title:foo region:bar"), "x:y title:foo region:bar");
    }

    #[test]
    fn test_insert_at_end_ignores_cursor() {
        let action = insert_action(" status:open", InsertPosition::End);
        let edit = run("title:foo", 3, &action).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:foo status:open");
        assert_eq!(edit.cursor, Some(21));
    }

    // ==================== append ====================

    fn append_action(value: &str) -> SuggestionAction {
        SuggestionAction::new(
            "a",
            "a",
            ActionKind::Append {
                value: value.to_owned(),
            },
        )
    }

    #[test]
    fn test_append_prefixes_space_mid_document() {
        let action = append_action("region:bar");
        let edit = run("title:foo", 3, &action).unwrap();
        // The probe after the field node hits the colon, so a space is
        // prefixed; the insertion still lands at the query's end.
        assert_eq!(edit.apply("title:foo"), "title:foo region:bar");
        assert_eq!(edit.cursor, Some(20));
    }

    #[test]
    fn test_append_at_document_end_glues() {
        let action = append_action("region:bar");
        let edit = run("title:foo", 9, &action).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:fooregion:bar");
        assert_eq!(edit.cursor, Some(19));
    }

    #[test]
    fn test_append_after_trailing_space() {
        let action = append_action("region:bar");
        let edit = run("title:foo ", 10, &action).unwrap();
        assert_eq!(edit.apply("title:foo "), "title:foo region:bar");
        assert_eq!(edit.cursor, Some(20));
    }

    #[test]
    fn test_append_into_empty_document() {
        let action = append_action("region:bar");
        let edit = run("", 0, &action).unwrap();
        assert_eq!(edit.apply(""), "region:bar");
        assert_eq!(edit.cursor, Some(10));
    }

    // ==================== set predicate ====================

    fn set_predicate_action(template: &str) -> SuggestionAction {
        SuggestionAction::new(
            "p",
            "p",
            ActionKind::SetPredicate {
                template: template.to_owned(),
            },
        )
    }

    #[test]
    fn test_set_predicate_replaces_value() {
        let edit = run("title:foo", 8, &set_predicate_action("bar")).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:bar");
        assert_eq!(edit.cursor, Some(9));
    }

    #[test]
    fn test_set_predicate_from_colon_node() {
        // On the colon there is no predicate ancestor; the lookup falls
        // back to the condition's predicate child.
        let edit = run("title:foo", 6, &set_predicate_action("bar")).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:bar");
    }

    #[test]
    fn test_set_predicate_marker_sets_cursor() {
        let edit = run("title:foo", 8, &set_predicate_action("\"|\"")).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:\"\"");
        assert_eq!(edit.cursor, Some(7));
    }

    #[test]
    fn test_set_predicate_creates_missing_predicate() {
        let edit = run("title:", 6, &set_predicate_action("foo")).unwrap();
        assert_eq!(edit.apply("title:"), "title:foo");
        assert_eq!(edit.cursor, Some(9));
    }

    #[test]
    fn test_set_predicate_creates_with_marker() {
        let edit = run("created:", 8, &set_predicate_action("after(|)")).unwrap();
        assert_eq!(edit.apply("created:"), "created:after()");
        assert_eq!(edit.cursor, Some(14));
    }

    #[test]
    fn test_set_predicate_after_field_and_space() {
        // "title: " parses as a condition with a missing predicate; the
        // insertion grows the node at the cursor.
        let edit = run("title: ", 7, &set_predicate_action("open")).unwrap();
        assert_eq!(edit.apply("title: "), "title: open");
    }

    #[test]
    fn test_set_predicate_on_empty_document() {
        let edit = run("", 0, &set_predicate_action("open")).unwrap();
        assert_eq!(edit.apply(""), "open");
        assert_eq!(edit.cursor, Some(4));
    }

    // ==================== argument preservation ====================

    #[test]
    fn test_preserves_bare_value_into_quoted_slot() {
        let edit = run("title:foo", 8, &set_predicate_action("contains(\"|\")")).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:contains(\"foo\")");
        assert_eq!(edit.cursor, Some(6 + 10 + 3));
    }

    #[test]
    fn test_preserves_quoted_value_into_quoted_slot() {
        let doc = "name:\"John\"";
        let edit = run(doc, 7, &set_predicate_action("starts_with(\"|\")")).unwrap();
        assert_eq!(edit.apply(doc), "name:starts_with(\"John\")");
    }

    #[test]
    fn test_preserves_quoted_value_into_bare_slot_keeps_quotes() {
        let doc = "created:\"2024\"";
        let edit = run(doc, 10, &set_predicate_action("after(|)")).unwrap();
        assert_eq!(edit.apply(doc), "created:after(\"2024\")");
    }

    #[test]
    fn test_preserves_command_argument() {
        let doc = "title:contains(\"hello\")";
        let edit = run(doc, 18, &set_predicate_action("starts_with(\"|\")")).unwrap();
        assert_eq!(edit.apply(doc), "title:starts_with(\"hello\")");
        // Cursor lands right after the preserved text.
        assert_eq!(edit.cursor, Some(6 + 13 + 5));
    }

    #[test]
    fn test_preserves_first_argument_only() {
        let doc = "date:after(2024)";
        let edit = run(doc, 13, &set_predicate_action("between(|,)")).unwrap();
        assert_eq!(edit.apply(doc), "date:between(2024,)");
        assert_eq!(edit.cursor, Some(5 + 8 + 4));
    }

    #[test]
    fn test_regex_predicate_is_not_preserved() {
        let doc = "name:/^t/";
        let edit = run(doc, 7, &set_predicate_action("contains(\"|\")")).unwrap();
        assert_eq!(edit.apply(doc), "name:contains(\"\")");
    }

    #[test]
    fn test_argumentless_command_is_not_preserved() {
        let doc = "date:after()";
        let edit = run(doc, 8, &set_predicate_action("before(|)")).unwrap();
        assert_eq!(edit.apply(doc), "date:before()");
    }

    #[test]
    fn test_plain_quote_template_does_not_preserve() {
        // The marker sits between quotes, not inside parentheses, so the
        // old value is dropped.
        let edit = run("title:foo", 8, &set_predicate_action("\"|\"")).unwrap();
        assert_eq!(edit.apply("title:foo"), "title:\"\"");
    }

    #[test]
    fn test_markerless_template_does_not_preserve() {
        let doc = "date:after(2024)";
        let edit = run(doc, 13, &set_predicate_action("today()")).unwrap();
        assert_eq!(edit.apply(doc), "date:today()");
        assert_eq!(edit.cursor, Some(12));
    }
}
