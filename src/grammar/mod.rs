/*!
The grammar engine. A [`Grammar`] is a list of rules, one per argument, plus
the [`Settings`] it was built with. Rules are registered one at a time and
then [`parse`][Grammar::parse] matches a token sequence against all of them,
producing [`Matches`] keyed by each rule's destination name.

Nothing in here knows about fields or schemas; the
[`builder`][crate::builder] is what turns fields into rules.
*/

mod matches;
mod state;

use core::fmt;
use std::sync::Arc;

use crate::Tags;
use crate::errors::{ParseError, SchemaError};
use crate::settings::{ConflictHandler, Settings};
use crate::value::{DefaultFn, ParseFn};

pub use self::matches::Matches;

/// How a rule turns its token into a value
#[derive(Clone)]
pub struct ValueRule {
    parse: ParseFn,
    type_name: &'static str,
    choices: Option<Arc<[String]>>,
}

impl ValueRule {
    /// `type_name` is only used in diagnostics
    #[must_use]
    pub fn new(parse: ParseFn, type_name: &'static str) -> Self {
        Self {
            parse,
            type_name,
            choices: None,
        }
    }

    /// Only accept tokens from this set
    #[must_use]
    pub fn choices(self, choices: Option<Arc<[String]>>) -> Self {
        Self { choices, ..self }
    }
}

/// A named argument that consumes one token
pub struct OptionRule {
    pub tags: Tags,
    pub value: ValueRule,
    pub required: bool,
    pub default: Option<DefaultFn>,
}

#[derive(Clone)]
enum Action {
    Value {
        value: ValueRule,
        required: bool,
        default: Option<DefaultFn>,
    },
    Flag,
    Help,
}

#[derive(Clone)]
struct Rule {
    dest: String,

    /// `None` for positional rules
    tags: Option<Tags>,
    action: Action,
}

impl Rule {
    fn long(&self) -> Option<&str> {
        self.tags.as_ref().and_then(Tags::long)
    }

    fn short(&self) -> Option<char> {
        self.tags.as_ref().and_then(Tags::short)
    }

    /// How diagnostics refer to this rule: `-n/--not_positional`, or the
    /// destination name for positionals
    fn display_name(&self) -> String {
        match self.tags {
            Some(ref tags) => tags.to_string(),
            None => self.dest.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Grammar {
    settings: Settings,
    rules: Vec<Rule>,
}

impl Grammar {
    /// Create an empty grammar. If `settings.add_help` is on, `-h/--help` is
    /// registered before anything else.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let mut rules = Vec::new();

        if settings.add_help {
            rules.push(Rule {
                dest: "help".to_owned(),
                tags: Some(Tags::new("help", Some('h'))),
                action: Action::Help,
            });
        }

        Self { settings, rules }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a positional argument. Positionals consume tokens in the
    /// order they're registered, and are always required.
    pub fn positional(
        &mut self,
        dest: impl Into<String>,
        value: ValueRule,
    ) -> Result<(), SchemaError> {
        let dest = dest.into();
        self.check_dest(&dest)?;

        tracing::debug!(dest = %dest, "registered positional");

        self.rules.push(Rule {
            dest,
            tags: None,
            action: Action::Value {
                value,
                required: true,
                default: None,
            },
        });

        Ok(())
    }

    /// Register a named argument that consumes one token
    pub fn option(&mut self, dest: impl Into<String>, rule: OptionRule) -> Result<(), SchemaError> {
        let dest = dest.into();
        self.check_dest(&dest)?;
        self.claim(&rule.tags)?;

        tracing::debug!(dest = %dest, tags = %rule.tags, required = rule.required, "registered option");

        self.rules.push(Rule {
            dest,
            tags: Some(rule.tags),
            action: Action::Value {
                value: rule.value,
                required: rule.required,
                default: rule.default,
            },
        });

        Ok(())
    }

    /// Register a presence flag: `true` if it appears, `false` if it doesn't
    pub fn flag(&mut self, dest: impl Into<String>, tags: Tags) -> Result<(), SchemaError> {
        let dest = dest.into();
        self.check_dest(&dest)?;
        self.claim(&tags)?;

        tracing::debug!(dest = %dest, %tags, "registered flag");

        self.rules.push(Rule {
            dest,
            tags: Some(tags),
            action: Action::Flag,
        });

        Ok(())
    }

    /// The option strings currently registered for `dest`
    pub fn tags(&self, dest: &str) -> Option<&Tags> {
        self.rules
            .iter()
            .filter(|rule| !matches!(rule.action, Action::Help))
            .find(|rule| rule.dest == dest)
            .and_then(|rule| rule.tags.as_ref())
    }

    /// The option strings for the help flag, if there still is one
    pub fn help_tags(&self) -> Option<&Tags> {
        self.rules
            .iter()
            .find(|rule| matches!(rule.action, Action::Help))
            .and_then(|rule| rule.tags.as_ref())
    }

    /// True if `dest` is a registered argument that must appear
    pub fn is_required(&self, dest: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.dest == dest && matches!(rule.action, Action::Value { required: true, .. })
        })
    }

    /// Match `tokens` (which should exclude the program name) against every
    /// rule.
    pub fn parse<'arg>(
        &self,
        tokens: impl IntoIterator<Item = &'arg [u8]>,
    ) -> Result<Matches, ParseError> {
        state::parse(self, tokens)
    }

    fn check_dest(&self, dest: &str) -> Result<(), SchemaError> {
        let invalid = |reason| SchemaError::InvalidName {
            field: dest.to_owned(),
            reason,
        };

        if dest.is_empty() {
            Err(invalid("argument names can't be empty"))
        } else if dest.starts_with('-') {
            Err(invalid("argument names can't start with '-'"))
        } else if dest.contains('=') {
            Err(invalid("argument names can't contain '='"))
        } else if dest.contains(char::is_whitespace) {
            Err(invalid("argument names can't contain whitespace"))
        } else if self
            .rules
            .iter()
            .any(|rule| rule.dest == dest && !matches!(rule.action, Action::Help))
        {
            Err(SchemaError::DuplicateDestination {
                dest: dest.to_owned(),
            })
        } else {
            Ok(())
        }
    }

    /// Make sure nothing else is using the option strings in `tags`, applying
    /// the conflict handler if something is.
    fn claim(&mut self, tags: &Tags) -> Result<(), SchemaError> {
        if let Some(long) = tags.long() {
            if let Some(index) = self.rules.iter().position(|rule| rule.long() == Some(long)) {
                self.conflict(index, format!("--{long}"), Tags::without_long)?;
            }
        }

        if let Some(short) = tags.short() {
            if let Some(index) = self.rules.iter().position(|rule| rule.short() == Some(short)) {
                self.conflict(index, format!("-{short}"), Tags::without_short)?;
            }
        }

        Ok(())
    }

    fn conflict(
        &mut self,
        index: usize,
        option: String,
        strip: fn(Tags) -> Option<Tags>,
    ) -> Result<(), SchemaError> {
        match self.settings.conflict_handler {
            ConflictHandler::Error => Err(SchemaError::ConflictingOption {
                option,
                existing: self.rules[index].display_name(),
            }),
            ConflictHandler::Resolve => {
                let rule = &mut self.rules[index];
                tracing::debug!(%option, existing = %rule.dest, "resolved option conflict");

                rule.tags = rule.tags.take().and_then(strip);
                if rule.tags.is_none() {
                    self.rules.remove(index);
                }

                Ok(())
            }
        }
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("settings", &self.settings)
            .field(
                "rules",
                &self.rules.iter().map(Rule::display_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
