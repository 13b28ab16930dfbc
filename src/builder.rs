/*!
The grammar builder: adds one rule to a [`Grammar`] per
[`FieldDescriptor`].

Named fields get a short alias if one is free: the first character of the
argument name that no earlier field has already claimed. The caller threads
the set of claimed aliases through successive calls, so the assignment
depends on declaration order.
*/

use std::collections::BTreeSet;

use crate::errors::SchemaError;
use crate::grammar::{Grammar, OptionRule, ValueRule};
use crate::reader::FieldDescriptor;
use crate::{MARKER, Tags};

/// Short aliases handed out so far
pub type ClaimedShorts = BTreeSet<char>;

/// Pick the short alias for `long`: its first character that isn't already
/// claimed. Only plain ASCII characters qualify, and never `-` or the
/// [`MARKER`].
#[must_use]
pub fn pick_short(long: &str, claimed: &ClaimedShorts) -> Option<char> {
    long.chars().find(|&c| {
        c.is_ascii_graphic() && c != '-' && c != MARKER && !claimed.contains(&c)
    })
}

/// Add the rule for `field` to `grammar`. Returns the short alias the field
/// was given, if it's named and one was free; add it to `claimed` before
/// building the next field.
pub fn build_rule(
    grammar: &mut Grammar,
    field: &FieldDescriptor,
    claimed: &ClaimedShorts,
) -> Result<Option<char>, SchemaError> {
    let value = || {
        ValueRule::new(field.effective_parser().clone(), field.ty.name())
            .choices(field.options.clone())
    };

    if !field.is_named() {
        if field.default.is_some() {
            return Err(SchemaError::PositionalDefault {
                field: field.name.clone(),
            });
        }

        grammar.positional(field.long.as_str(), value())?;
        return Ok(None);
    }

    let short = pick_short(&field.long, claimed);
    let tags = Tags::new(field.long.as_str(), short);

    if field.ty.is_flag() {
        if field.default.is_some() || field.options.is_some() {
            tracing::debug!(
                field = %field.name,
                "flags are false unless present; ignoring declared default and options"
            );
        }

        grammar.flag(field.long.as_str(), tags)?;
    } else {
        grammar.option(
            field.long.as_str(),
            OptionRule {
                tags,
                value: value(),
                required: field.default.is_none() && !field.optional,
                default: field.default.clone(),
            },
        )?;
    }

    tracing::debug!(field = %field.name, short = ?short, "built named argument");

    Ok(short)
}

/// Build a whole grammar from `fields`, in order
pub fn build_grammar(
    mut grammar: Grammar,
    fields: &[FieldDescriptor],
) -> Result<Grammar, SchemaError> {
    let mut claimed = ClaimedShorts::new();

    for field in fields {
        if let Some(short) = build_rule(&mut grammar, field, &claimed)? {
            claimed.insert(short);
        }
    }

    Ok(grammar)
}
