//! Builds the suggestion list for a cursor position.
//!
//! Two providers contribute, in order: configured field values and
//! predicate templates for the field's type, then the prefix toggles for
//! the enclosing condition.

use crate::action::model::{ActionContext, ActionKind, SuggestionAction, Transform};
use crate::action::predicates::predicate_actions;
use crate::schema::{field_config, SuggestionConfig};
use crate::syntax::NodeKind;

/// The prefix toggles for the condition enclosing the cursor, with
/// descriptions reflecting the condition's current state. Empty when the
/// cursor is outside any condition.
#[must_use]
pub fn condition_modifiers(ctx: &ActionContext<'_>) -> Vec<SuggestionAction> {
    let Some(condition) = ctx.condition else {
        return Vec::new();
    };
    let kind = ctx.tree.kind(condition);

    let negate_description = if kind == NodeKind::ExcludeCondition {
        "Remove negation"
    } else {
        "Exclude from results"
    };
    let disable_description = if kind == NodeKind::IgnoredCondition {
        "Enable condition"
    } else {
        "Disable condition"
    };

    vec![
        SuggestionAction::new("negate", "-", ActionKind::Transform(Transform::Negate))
            .with_description(negate_description),
        SuggestionAction::new("disable", "!", ActionKind::Transform(Transform::Disable))
            .with_description(disable_description),
    ]
}

/// Suggestions driven by the field's configuration entry: predicate
/// templates for its type first, then the configured values.
#[must_use]
pub fn field_value_actions(
    config: &SuggestionConfig,
    field: Option<&str>,
) -> Vec<SuggestionAction> {
    let Some(entry) = field_config(config, field) else {
        return Vec::new();
    };

    let mut actions = Vec::new();
    if let Some(field_type) = entry.field_type {
        actions.extend(predicate_actions(field_type));
    }
    for value in &entry.values {
        actions.push(SuggestionAction {
            id: format!("field-value-{}", value.label),
            label: value.label.clone(),
            description: value.description.clone(),
            kind: value.action.clone().into(),
        });
    }
    actions
}

/// The full suggestion list for a cursor context.
///
/// # Arguments
///
/// * `ctx` - Cursor context built with [`ActionContext::at`].
/// * `config` - Suggestion configuration for the collection being edited.
#[must_use]
pub fn actions_for(ctx: &ActionContext<'_>, config: &SuggestionConfig) -> Vec<SuggestionAction> {
    let mut actions = field_value_actions(config, ctx.field.as_deref());
    actions.extend(condition_modifiers(ctx));
    actions
}
