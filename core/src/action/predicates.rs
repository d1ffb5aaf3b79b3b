//! Built-in predicate templates per field type.

use crate::action::model::{ActionKind, SuggestionAction};
use crate::schema::FieldType;

struct Template {
    label: &'static str,
    template: &'static str,
    description: &'static str,
}

const TEXT: &[Template] = &[
    Template {
        label: "\"...\"",
        template: "\"|\"",
        description: "Exact match",
    },
    Template {
        label: "contains()",
        template: "contains(\"|\")",
        description: "Contains the given text",
    },
    Template {
        label: "starts_with()",
        template: "starts_with(\"|\")",
        description: "Starts with the given text",
    },
    Template {
        label: "ends_with()",
        template: "ends_with(\"|\")",
        description: "Ends with the given text",
    },
];

const KEYWORD: &[Template] = &[Template {
    label: "\"...\"",
    template: "\"|\"",
    description: "Exact match",
}];

const UUID: &[Template] = &[Template {
    label: "one_of()",
    template: "one_of(\"|\")",
    description: "Match one of these values",
}];

const DATE: &[Template] = &[
    Template {
        label: "after()",
        template: "after(|)",
        description: "After this date",
    },
    Template {
        label: "before()",
        template: "before(|)",
        description: "Before this date",
    },
    Template {
        label: "between()",
        template: "between(|,)",
        description: "Between two dates",
    },
];

/// The predicate suggestions for a field type.
///
/// Ids follow the `predicate-{type}-{label}` scheme, e.g.
/// `predicate-date-after()`.
#[must_use]
pub fn predicate_actions(field_type: FieldType) -> Vec<SuggestionAction> {
    let templates = match field_type {
        FieldType::Text => TEXT,
        FieldType::Keyword => KEYWORD,
        FieldType::Uuid => UUID,
        FieldType::Date => DATE,
    };
    templates
        .iter()
        .map(|entry| SuggestionAction {
            id: format!("predicate-{field_type}-{}", entry.label),
            label: entry.label.to_owned(),
            description: Some(entry.description.to_owned()),
            kind: ActionKind::SetPredicate {
                template: entry.template.to_owned(),
            },
        })
        .collect()
}
