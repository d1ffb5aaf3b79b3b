//! Pure rewrites of [`ConditionParts`].
//!
//! Every function here is total: it takes parts by reference and returns a
//! modified copy, preserving the originating node. Applying a transform and
//! serializing commutes with editing the source text directly.

use crate::condition::model::{ConditionParts, Prefix};

/// Toggles the `-` prefix. An `!` prefix is replaced rather than stacked.
#[must_use]
pub fn negate(parts: &ConditionParts) -> ConditionParts {
    let prefix = match parts.prefix {
        Prefix::Exclude => Prefix::None,
        _ => Prefix::Exclude,
    };
    ConditionParts {
        prefix,
        ..parts.clone()
    }
}

/// Toggles the `!` prefix. A `-` prefix is replaced rather than stacked.
#[must_use]
pub fn disable(parts: &ConditionParts) -> ConditionParts {
    let prefix = match parts.prefix {
        Prefix::Ignore => Prefix::None,
        _ => Prefix::Ignore,
    };
    ConditionParts {
        prefix,
        ..parts.clone()
    }
}

/// Replaces the field, leaving prefix and predicate untouched.
#[must_use]
pub fn set_field(parts: &ConditionParts, field: &str) -> ConditionParts {
    ConditionParts {
        field: field.to_owned(),
        ..parts.clone()
    }
}

/// Replaces the predicate, leaving prefix and field untouched.
#[must_use]
pub fn set_predicate(parts: &ConditionParts, predicate: &str) -> ConditionParts {
    ConditionParts {
        predicate: predicate.to_owned(),
        ..parts.clone()
    }
}

/// Wraps the current predicate in a command call: `foo` becomes
/// `name(foo)`.
#[must_use]
pub fn wrap_in_command(parts: &ConditionParts, name: &str) -> ConditionParts {
    ConditionParts {
        predicate: format!("{name}({})", parts.predicate),
        ..parts.clone()
    }
}
