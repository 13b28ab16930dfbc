/*!
Running a bind: schema in, populated fields out.

A [`Binder`] reads the schema's fields, builds a grammar from them, parses
the tokens, and collects each field's value into a [`Bound`], keyed by the
field's declared name. Nothing is cached between binds, so one schema can be
bound any number of times, from any number of threads.
*/

use core::{any::type_name, fmt};
use std::{collections::HashMap, ffi::OsStr, process};

use crate::arguments::LoadedArguments;
use crate::builder::build_grammar;
use crate::errors::{Error, FieldError, SchemaError};
use crate::grammar::Grammar;
use crate::printers;
use crate::reader::read_fields;
use crate::schema::Schema;
use crate::settings::Settings;
use crate::value::{AnyValue, short_type_name};

/// Binds tokens against one schema
#[derive(Debug, Clone)]
pub struct Binder<'s> {
    schema: &'s Schema,
    settings: Settings,
}

impl<'s> Binder<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            settings: Settings::default(),
        }
    }

    /// Replace the engine settings. They're handed to the grammar as is.
    #[must_use]
    pub fn settings(self, settings: Settings) -> Self {
        Self { settings, ..self }
    }

    /// Read the schema and build its grammar, without parsing anything
    pub fn grammar(&self) -> Result<Grammar, SchemaError> {
        let fields = read_fields(self.schema);
        build_grammar(Grammar::new(self.settings.clone()), &fields)
    }

    /// Bind `tokens` (which shouldn't include the program name). Never prints
    /// anything and never exits; a help request comes back as an error.
    pub fn try_bind<I>(&self, tokens: I) -> Result<Bound, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let tokens: Vec<I::Item> = tokens.into_iter().collect();
        self.try_bind_bytes(tokens.iter().map(AsRef::<[u8]>::as_ref))
    }

    fn try_bind_bytes<'arg>(
        &self,
        tokens: impl IntoIterator<Item = &'arg [u8]>,
    ) -> Result<Bound, Error> {
        let fields = read_fields(self.schema);
        let grammar = build_grammar(Grammar::new(self.settings.clone()), &fields)?;
        let mut matches = grammar.parse(tokens)?;

        let values = fields
            .iter()
            .filter_map(|field| {
                matches
                    .take(&field.long)
                    .map(|value| (field.name.clone(), value))
            })
            .collect();

        Ok(Bound { values })
    }

    /**
    Bind `tokens`, reporting failures the way command-line tools do.

    A help request prints the configured help text to stdout and exits with
    status 0. If `exit_on_error` is set, any other error is printed to
    stderr and the process exits with status 2; otherwise the error is
    returned without printing anything.
    */
    pub fn bind<I>(&self, tokens: I) -> Result<Bound, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let argv0 = std::env::args_os().next();

        self.try_bind(tokens)
            .map_err(|error| self.fail(argv0.as_deref(), error))
    }

    /// Like [`bind`][Self::bind], using the process arguments
    pub fn bind_env(&self) -> Result<Bound, Error> {
        let arguments = LoadedArguments::from_env();

        self.try_bind_bytes(arguments.tokens())
            .map_err(|error| self.fail(arguments.argv0(), error))
    }

    /// Report `error`, exiting if it's a help request or if the settings say
    /// to. Returns the error if the process is still running.
    pub(crate) fn fail(&self, argv0: Option<&OsStr>, error: Error) -> Error {
        tracing::debug!(%error, "bind failed");

        match Disposition::of(&self.settings, &error) {
            Disposition::Help => {
                // Nothing left to do if stdout is gone
                let _ = printers::print_help(&self.settings);
                process::exit(error.exit_code());
            }
            Disposition::Exit => {
                let prog = printers::program_name(&self.settings, argv0);
                let _ = printers::print_error(&prog, &self.settings, &error);
                process::exit(error.exit_code());
            }
            Disposition::Return => error,
        }
    }

    /// Used by [`FromArgs`] to report errors that happen after parsing
    pub(crate) fn fail_env(&self, error: Error) -> Error {
        let argv0 = std::env::args_os().next();
        self.fail(argv0.as_deref(), error)
    }
}

/// What [`Binder::fail`] does with an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Help,
    Exit,
    Return,
}

impl Disposition {
    fn of(settings: &Settings, error: &Error) -> Self {
        if error.is_help_request() {
            Self::Help
        } else if settings.exit_on_error {
            Self::Exit
        } else {
            Self::Return
        }
    }
}

/// The values produced by a bind, keyed by declared field name (marker
/// included). Optional fields that didn't appear have no entry.
#[derive(Default)]
pub struct Bound {
    values: HashMap<String, AnyValue>,
}

impl Bound {
    /// Remove the value of `field`
    pub fn take<T: 'static>(&mut self, field: &str) -> Result<T, FieldError> {
        let value = self.values.remove(field).ok_or_else(|| FieldError::Missing {
            field: field.to_owned(),
        })?;

        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => {
                self.values.insert(field.to_owned(), value);
                Err(FieldError::TypeMismatch {
                    field: field.to_owned(),
                    expected: short_type_name(type_name::<T>()),
                })
            }
        }
    }

    /// Remove the value of an optional field; `None` if it wasn't given
    pub fn take_optional<T: 'static>(&mut self, field: &str) -> Result<Option<T>, FieldError> {
        match self.values.contains_key(field) {
            true => self.take(field).map(Some),
            false => Ok(None),
        }
    }

    pub fn get<T: 'static>(&self, field: &str) -> Result<&T, FieldError> {
        self.values
            .get(field)
            .ok_or_else(|| FieldError::Missing {
                field: field.to_owned(),
            })?
            .downcast_ref::<T>()
            .ok_or_else(|| FieldError::TypeMismatch {
                field: field.to_owned(),
                expected: short_type_name(type_name::<T>()),
            })
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.values.keys().map(String::as_str).collect();
        fields.sort_unstable();

        f.debug_struct("Bound").field("fields", &fields).finish()
    }
}

/**
A type that can be populated from command-line arguments. Usually derived
with [`#[derive(FromArgs)]`][macro@crate::FromArgs].

Implementors describe their fields with [`schema`][FromArgs::schema] and
build themselves from the result with [`from_bound`][FromArgs::from_bound];
the provided methods do everything in between.
*/
pub trait FromArgs: Sized {
    fn schema() -> Schema;

    fn settings() -> Settings {
        Settings::default()
    }

    fn from_bound(bound: Bound) -> Result<Self, FieldError>;

    /// Bind `tokens` (without a program name). Never prints or exits.
    fn try_from_tokens<I>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Self::try_from_tokens_with(Self::settings(), tokens)
    }

    /// Like [`try_from_tokens`][FromArgs::try_from_tokens], with settings
    /// other than the type's own
    fn try_from_tokens_with<I>(settings: Settings, tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let schema = Self::schema();
        let bound = Binder::new(&schema).settings(settings).try_bind(tokens)?;
        Ok(Self::from_bound(bound)?)
    }

    /// Bind `tokens`, printing diagnostics and exiting the way
    /// [`Binder::bind`] does
    fn from_tokens<I>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let schema = Self::schema();
        let binder = Binder::new(&schema).settings(Self::settings());
        let bound = binder.bind(tokens)?;

        Self::from_bound(bound).map_err(|error| binder.fail_env(error.into()))
    }

    /// Bind the process arguments, printing diagnostics and exiting the way
    /// [`Binder::bind`] does
    fn from_env() -> Result<Self, Error> {
        let schema = Self::schema();
        let binder = Binder::new(&schema).settings(Self::settings());
        let bound = binder.bind_env()?;

        Self::from_bound(bound).map_err(|error| binder.fail_env(error.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;

    fn sample() -> Schema {
        let mut schema = Schema::new();
        schema.field::<i32>("count");
        schema.field::<f64>("rate_");
        schema.optional::<String>("label_");
        schema
    }

    #[test]
    fn keyed_by_declared_name() {
        let schema = sample();
        let mut bound = Binder::new(&schema)
            .try_bind(["3", "--rate", "0.5"])
            .unwrap();

        assert_eq!(bound.get::<i32>("count").unwrap(), &3);
        assert_eq!(bound.take::<f64>("rate_").unwrap(), 0.5);
        assert!(!bound.contains("rate"));
        assert_eq!(bound.take_optional::<String>("label_").unwrap(), None);
    }

    #[test]
    fn type_mismatch_keeps_the_value() {
        let schema = sample();
        let mut bound = Binder::new(&schema).try_bind(["3", "-r", "1"]).unwrap();

        assert!(matches!(
            bound.take::<String>("count"),
            Err(FieldError::TypeMismatch { expected: "String", .. })
        ));
        assert_eq!(bound.take::<i32>("count").unwrap(), 3);
        assert!(matches!(
            bound.take::<i32>("count"),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn help_is_an_error_for_try_bind() {
        let schema = sample();
        let err = Binder::new(&schema).try_bind(["-h"]).unwrap_err();

        assert!(err.is_help_request());
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn bind_returns_error_without_exit_on_error() {
        let schema = sample();
        let err = Binder::new(&schema)
            .settings(Settings::default().prog("sample").exit_on_error(false))
            .bind(["3"])
            .unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::MissingRequired { .. })));
    }

    #[test]
    fn dispositions() {
        let help = Error::Parse(ParseError::HelpRequested);
        let missing = Error::Parse(ParseError::MissingRequired {
            arguments: vec!["count".to_owned()],
        });
        let quiet = Settings::default().exit_on_error(false);

        assert_eq!(Disposition::of(&Settings::default(), &help), Disposition::Help);
        assert_eq!(Disposition::of(&quiet, &help), Disposition::Help);
        assert_eq!(Disposition::of(&Settings::default(), &missing), Disposition::Exit);
        assert_eq!(Disposition::of(&quiet, &missing), Disposition::Return);
    }

    #[test]
    fn schema_errors_surface_before_parsing() {
        let mut schema = Schema::new();
        schema.field::<String>("host_");

        let err = Binder::new(&schema).try_bind(["--bogus"]).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::ConflictingOption { .. })));
    }
}
