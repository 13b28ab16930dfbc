/*!
Everything that can go wrong while binding.

[`SchemaError`]s are mistakes in the field declarations and are found while
the grammar is built, before any token is looked at. [`ParseError`]s come from
the tokens. [`FieldError`]s only happen when a [`Bound`][crate::Bound] is
asked for a field it doesn't have, or for the wrong type.
*/

use std::sync::Arc;

use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::value::ValueError;

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A positional field declared a default value. Positional arguments are
    /// always required, so the default could never be used.
    #[error("field {field:?}: positional fields can't declare a default value")]
    PositionalDefault { field: String },

    /// A field name that can't be turned into an argument
    #[error("field {field:?}: {reason}")]
    InvalidName { field: String, reason: &'static str },

    /// Two arguments claimed the same `-s` or `--long` option string
    #[error("argument {option}: conflicting option string (already used by {existing:?})")]
    ConflictingOption { option: String, existing: String },

    /// Two fields bind to the same argument name, such as `rate` and `rate_`
    #[error("more than one field binds to the argument name {dest:?}")]
    DuplicateDestination { dest: String },
}

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// `-h` or `--help` appeared on the command line
    #[error("help requested")]
    HelpRequested,

    /// Required arguments were absent. Listed in declaration order.
    #[error("the following arguments are required: {}", .arguments.iter().join_with(", "))]
    MissingRequired { arguments: Vec<String> },

    /// The parser rejected the token
    #[error("argument {argument}: invalid {type_name} value: {value:?} ({source})")]
    InvalidValue {
        argument: String,
        type_name: &'static str,
        value: String,
        source: ValueError,
    },

    /// The token isn't one of the argument's allowed values
    #[error(
        "argument {argument}: invalid choice: {value:?} (choose from {})",
        .choices.iter().map(|choice| lazy_format!("{:?}", choice)).join_with(", ")
    )]
    InvalidChoice {
        argument: String,
        value: String,
        choices: Arc<[String]>,
    },

    /// The option needs a value and the tokens ran out (or hit `--`)
    #[error("argument {argument}: expected one argument")]
    ExpectedArgument { argument: String },

    /// A flag was given a value, as in `--verbose=yes`
    #[error("argument {argument}: ignored explicit argument {value:?}")]
    UnexpectedArgument { argument: String, value: String },

    /// A long option prefix matched more than one option
    #[error(
        "ambiguous option: --{option} could match {}",
        .candidates.iter().map(|long| lazy_format!("--{}", long)).join_with(", ")
    )]
    AmbiguousOption {
        option: String,
        candidates: Vec<String>,
    },

    /// Tokens that matched nothing in the grammar
    #[error("unrecognized arguments: {}", .arguments.iter().join_with(" "))]
    Unrecognized { arguments: Vec<String> },

    /// The token, or the option name, wasn't valid UTF-8
    #[error("argument {argument}: invalid UTF-8 in {value}")]
    InvalidUtf8 { argument: String, value: String },
}

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    #[error("no value was bound to field {field:?}")]
    Missing { field: String },

    #[error("field {field:?} isn't bound to a value of type {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// True if this "error" is really a request to print the help text
    #[must_use]
    pub fn is_help_request(&self) -> bool {
        matches!(self, Error::Parse(ParseError::HelpRequested))
    }

    /// The process exit status for this error, the way command-line tools
    /// conventionally report it: 0 for a help request, 2 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.is_help_request() {
            true => 0,
            false => 2,
        }
    }
}
