/*!
Describing the fields of a schema.

A [`Schema`] is an ordered list of fields plus a table of type-wide parser
overrides. Order matters: it's the order positional arguments are consumed
in, and the order short aliases are handed out in. Usually you'll get a schema
from [`#[derive(FromArgs)]`][macro@crate::FromArgs], but it can also be built
by hand:

```
use clapp::Schema;

let mut schema = Schema::new();
schema.field::<i32>("a").parser(|arg: &str| arg.parse::<i32>().map(|a| a + 1));
schema.field::<f64>("b");
schema.field::<String>("mode_").options(["fast", "slow"]).default("fast".to_owned());
schema.optional::<String>("label_");
schema.type_parser(|arg: &str| arg.parse::<f64>().map(|b| b + 0.1));
```
*/

use core::{any::TypeId, fmt, marker::PhantomData};
use std::{collections::HashMap, sync::Arc};

use crate::MARKER;
use crate::value::{DefaultFn, ParseFn, TypeInfo, Value, erase_default, erase_parser};

/// Whether a field is consumed by position or given with a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Positional,
    Named,
}

impl FieldKind {
    /// Apply the naming convention: a trailing [`MARKER`] means named
    #[inline]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.ends_with(MARKER) {
            true => FieldKind::Named,
            false => FieldKind::Positional,
        }
    }
}

/// A single field, as declared
#[derive(Clone)]
pub(crate) struct FieldSpec {
    pub name: String,
    pub long: String,
    pub kind: FieldKind,
    pub ty: TypeInfo,
    pub optional: bool,
    pub default: Option<DefaultFn>,
    pub parser: Option<ParseFn>,
    pub options: Option<Arc<[String]>>,
}

impl FieldSpec {
    fn new(name: String, ty: TypeInfo, optional: bool) -> Self {
        let kind = FieldKind::from_name(&name);
        let long = match kind {
            FieldKind::Named => name.strip_suffix(MARKER).unwrap_or(&name).to_owned(),
            FieldKind::Positional => name.clone(),
        };

        Self {
            name,
            long,
            kind,
            ty,
            optional,
            default: None,
            parser: None,
            options: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    type_parsers: HashMap<TypeId, ParseFn>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field of type `T`. If `name` ends with [`MARKER`] the field
    /// is named, and its long option is `name` without the marker; otherwise
    /// it's positional.
    pub fn field<T: Value>(&mut self, name: impl Into<String>) -> FieldBuilder<'_, T> {
        self.push(FieldSpec::new(name.into(), TypeInfo::of::<T>(), false))
    }

    /// Declare a field that may be absent. Named optional fields are never
    /// required, even without a default; their value is simply left unset.
    pub fn optional<T: Value>(&mut self, name: impl Into<String>) -> FieldBuilder<'_, T> {
        self.push(FieldSpec::new(name.into(), TypeInfo::of::<T>(), true))
    }

    fn push<T>(&mut self, spec: FieldSpec) -> FieldBuilder<'_, T> {
        let index = self.fields.len();
        self.fields.push(spec);

        FieldBuilder {
            spec: &mut self.fields[index],
            ty: PhantomData,
        }
    }

    /// Register a parser for every field of type `T` (or optional `T`) that
    /// doesn't have a parser of its own. Registering twice for the same type
    /// replaces the earlier parser.
    pub fn type_parser<T, E>(
        &mut self,
        parse: impl Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Value,
        E: fmt::Display,
    {
        self.type_parsers
            .insert(TypeId::of::<T>(), erase_parser(parse));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    #[inline]
    pub(crate) fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[inline]
    pub(crate) fn type_parser_for(&self, id: TypeId) -> Option<&ParseFn> {
        self.type_parsers.get(&id)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields.iter().map(|field| &field.name).collect::<Vec<_>>())
            .field("type_parsers", &self.type_parsers.len())
            .finish()
    }
}

/// Configures the field most recently declared on a [`Schema`]
pub struct FieldBuilder<'a, T> {
    spec: &'a mut FieldSpec,
    ty: PhantomData<fn() -> T>,
}

impl<T: Value> FieldBuilder<'_, T> {
    /// Make this field named even though its name doesn't end with
    /// [`MARKER`]. The long option is the name as given.
    pub fn named(self) -> Self {
        self.spec.kind = FieldKind::Named;
        self
    }

    /// A parser for this field alone. It takes precedence over any
    /// [`type_parser`][Schema::type_parser] for `T`.
    pub fn parser<E: fmt::Display>(
        self,
        parse: impl Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    ) -> Self {
        self.spec.parser = Some(erase_parser(parse));
        self
    }

    /// Restrict the field to a closed set of tokens
    pub fn options(self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.spec.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// The value used when a named field is absent from the command line
    pub fn default(self, value: T) -> Self
    where
        T: Clone + Sync,
    {
        self.default_with(move || value.clone())
    }

    /// Like [`default`][Self::default], but computes a fresh default for
    /// every bind
    pub fn default_with(self, make: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.spec.default = Some(erase_default(make));
        self
    }
}
