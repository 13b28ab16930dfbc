/*!
Engine-level options. The [`Binder`][crate::Binder] passes these through to
the [`Grammar`][crate::grammar::Grammar] untouched.
*/

use core::str::FromStr;

/// What to do when two arguments claim the same option string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictHandler {
    /// Registering the second argument fails
    #[default]
    Error,

    /// The second argument wins; the option string is removed from the first
    Resolve,
}

impl FromStr for ConflictHandler {
    type Err = UnknownConflictHandler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "resolve" => Ok(Self::Resolve),
            other => Err(UnknownConflictHandler(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown conflict handler {0:?} (expected \"error\" or \"resolve\")")]
pub struct UnknownConflictHandler(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prog: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    pub epilog: Option<String>,

    /// Register `-h/--help` ahead of every field
    pub add_help: bool,

    /// Accept unambiguous prefixes of long options
    pub allow_abbrev: bool,

    pub conflict_handler: ConflictHandler,

    /// Print a diagnostic and end the process when binding fails. When
    /// off, the error is returned and nothing is printed.
    pub exit_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prog: None,
            usage: None,
            description: None,
            epilog: None,
            add_help: true,
            allow_abbrev: true,
            conflict_handler: ConflictHandler::Error,
            exit_on_error: true,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prog(self, prog: impl Into<String>) -> Self {
        Self {
            prog: Some(prog.into()),
            ..self
        }
    }

    #[must_use]
    pub fn usage(self, usage: impl Into<String>) -> Self {
        Self {
            usage: Some(usage.into()),
            ..self
        }
    }

    #[must_use]
    pub fn description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn epilog(self, epilog: impl Into<String>) -> Self {
        Self {
            epilog: Some(epilog.into()),
            ..self
        }
    }

    #[must_use]
    pub fn add_help(self, add_help: bool) -> Self {
        Self { add_help, ..self }
    }

    #[must_use]
    pub fn allow_abbrev(self, allow_abbrev: bool) -> Self {
        Self {
            allow_abbrev,
            ..self
        }
    }

    #[must_use]
    pub fn conflict_handler(self, conflict_handler: ConflictHandler) -> Self {
        Self {
            conflict_handler,
            ..self
        }
    }

    #[must_use]
    pub fn exit_on_error(self, exit_on_error: bool) -> Self {
        Self {
            exit_on_error,
            ..self
        }
    }
}
