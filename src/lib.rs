/*!
Declarative command-line binding. Describe your arguments as the fields of a
struct, and `clapp` derives the command-line grammar from that description,
parses the tokens against it, and hands back a populated value.

```ignore
use clapp::FromArgs;

#[derive(FromArgs, Debug)]
struct Arguments {
    /// Positional: the name doesn't end in `_`
    input: String,

    /// Named: `-r` / `--rate`, required because there's no default
    rate_: f64,

    /// Named flag: `-v` / `--verbose`
    verbose_: bool,

    /// Named and optional: no default needed, absent means `None`
    label_: Option<String>,

    #[clapp(default = 4, options = ["1", "2", "4", "8"])]
    jobs_: u8,
}

fn main() -> Result<(), clapp::Error> {
    // Prints a diagnostic and exits with status 2 if the arguments are bad
    let args = Arguments::from_env()?;
    println!("{args:#?}");
    Ok(())
}
```

The pieces, in the order a bind uses them:

- [`schema`] describes fields, either by hand through [`Schema`] or with
  [`#[derive(FromArgs)]`][macro@FromArgs].
- [`reader`] turns a schema into ordered [`FieldDescriptor`][reader::FieldDescriptor]s,
  resolving which parser each field uses.
- [`builder`] turns each descriptor into one rule of a [`Grammar`][grammar::Grammar],
  assigning short aliases as it goes.
- [`binder`] runs the whole thing and copies the parsed values back onto the
  declared fields.
*/

mod arguments;
pub mod binder;
pub mod builder;
pub mod errors;
pub mod grammar;
mod impls;
mod printers;
pub mod reader;
pub mod schema;
pub mod settings;
pub mod value;

use core::fmt;

pub use clapp_derive::FromArgs;

pub use crate::binder::{Binder, Bound, FromArgs};
pub use crate::errors::{Error, FieldError, ParseError, SchemaError};
pub use crate::schema::{FieldBuilder, FieldKind, Schema};
pub use crate::settings::{ConflictHandler, Settings};
pub use crate::value::{ParsedValue, Value, ValueError, ValueKind};

/// A field whose declared name ends with this character is a named argument
/// rather than a positional one.
pub const MARKER: char = '_';

/// The set of option strings that identify a named argument (`-s`, `--long`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tags {
    /// This argument uses only a long tag
    Long { long: String },

    /// This argument uses only a short tag
    Short { short: char },

    /// This argument uses both a long and short tag
    LongShort { long: String, short: char },
}

impl Tags {
    #[must_use]
    pub fn new(long: impl Into<String>, short: Option<char>) -> Self {
        let long = long.into();

        match short {
            None => Tags::Long { long },
            Some(short) => Tags::LongShort { long, short },
        }
    }

    /// Get the long tag, if any
    #[inline]
    #[must_use]
    pub fn long(&self) -> Option<&str> {
        match self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    /// Get the short tag, if any
    #[inline]
    #[must_use]
    pub fn short(&self) -> Option<char> {
        match *self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(short),
            Tags::Long { .. } => None,
        }
    }

    /// Drop the long tag. Returns `None` if nothing would be left.
    #[must_use]
    pub fn without_long(self) -> Option<Self> {
        self.short().map(|short| Tags::Short { short })
    }

    /// Drop the short tag. Returns `None` if nothing would be left.
    #[must_use]
    pub fn without_short(self) -> Option<Self> {
        match self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(Tags::Long { long }),
            Tags::Short { .. } => None,
        }
    }
}

/// Prints the tags the way diagnostics refer to them: `-n/--not_positional`
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tags::Long { long } => write!(f, "--{long}"),
            Tags::Short { short } => write!(f, "-{short}"),
            Tags::LongShort { long, short } => write!(f, "-{short}/--{long}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_display() {
        assert_eq!(Tags::new("rate", Some('r')).to_string(), "-r/--rate");
        assert_eq!(Tags::new("rate", None).to_string(), "--rate");
        assert_eq!(Tags::Short { short: 'h' }.to_string(), "-h");
    }

    #[test]
    fn dropping_tags() {
        let tags = Tags::new("help", Some('h'));
        assert_eq!(
            tags.clone().without_short(),
            Some(Tags::Long {
                long: "help".to_owned()
            })
        );
        assert_eq!(tags.without_long(), Some(Tags::Short { short: 'h' }));
        assert_eq!(Tags::Short { short: 'h' }.without_short(), None);
    }
}
