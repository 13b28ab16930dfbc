/*!
Traits and type-erased containers for the values that fields are bound to.

A field's type decides two things: whether the field is a presence flag or
consumes a token, and how that token is turned into a value when no parser
override applies. Both come from the [`Value`] trait.
*/

use core::{
    any::{Any, TypeId},
    fmt::{self, Display},
    str::FromStr,
};
use std::sync::Arc;

/// The message produced when a token fails to convert into a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValueError {
    message: String,
}

impl ValueError {
    pub fn new(message: impl Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How a named field of this type appears on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Takes no token; present means `true`
    Flag,

    /// Consumes exactly one token
    Value,
}

/**
A type that fields can be declared with.

[`from_arg`][Value::from_arg] is the type's own string constructor, used when
neither a field-specific nor a type-specific parser is registered. Most types
should get this for free through [`ParsedValue`].
*/
pub trait Value: Sized + Send + 'static {
    const KIND: ValueKind = ValueKind::Value;

    fn from_arg(arg: &str) -> Result<Self, ValueError>;
}

/// For types with a [`FromStr`] implementation, [`ParsedValue`] automatically
/// gives them a [`Value`] implementation so that they can be used as fields.
pub trait ParsedValue: FromStr {}

impl<T> Value for T
where
    T: ParsedValue + Send + 'static,
    T::Err: Display,
{
    #[inline]
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse().map_err(ValueError::new)
    }
}

/// A parsed value whose type has been erased until it's handed back to
/// the field it belongs to
pub type AnyValue = Box<dyn Any + Send>;

/// A parser from a single token into an erased value
pub type ParseFn = Arc<dyn Fn(&str) -> Result<AnyValue, ValueError> + Send + Sync>;

/// Produces a fresh copy of a declared default for every bind
pub type DefaultFn = Arc<dyn Fn() -> AnyValue + Send + Sync>;

pub(crate) fn erase_parser<T, E, F>(parse: F) -> ParseFn
where
    T: Send + 'static,
    E: Display,
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(move |arg: &str| -> Result<AnyValue, ValueError> {
        match parse(arg) {
            Ok(value) => Ok(Box::new(value)),
            Err(err) => Err(ValueError::new(err)),
        }
    })
}

pub(crate) fn erase_default<T, F>(make: F) -> DefaultFn
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move || -> AnyValue { Box::new(make()) })
}

/// Everything about a field's (unwrapped) type that binding needs to know
#[derive(Clone)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: ValueKind,
    constructor: ParseFn,
}

impl TypeInfo {
    pub fn of<T: Value>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(core::any::type_name::<T>()),
            kind: T::KIND,
            constructor: erase_parser(T::from_arg),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type's name without its module path, for diagnostics
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn is_flag(&self) -> bool {
        self.kind == ValueKind::Flag
    }

    /// The type's own string constructor, [`Value::from_arg`]
    #[inline]
    pub fn constructor(&self) -> &ParseFn {
        &self.constructor
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// `alloc::string::String` -> `String`, `my::Wrapper<u8>` -> `Wrapper<u8>`
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let path_end = full.find('<').unwrap_or(full.len());

    match full[..path_end].rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}
