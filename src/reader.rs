/*!
The attribute reader: turns a [`Schema`] into the ordered list of
[`FieldDescriptor`]s that the grammar is built from.

Descriptors are built fresh for every bind and never change afterwards. The
only real decision made here is which parser each field uses: a parser
registered for the field itself always wins over one registered for the
field's type, and if neither exists the descriptor carries no override and the
type's own constructor is used.
*/

use std::sync::Arc;

use crate::schema::{FieldKind, Schema};
use crate::value::{DefaultFn, ParseFn, TypeInfo};

/// Where a parser override came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideScope {
    /// Registered on the field itself
    Field,

    /// Registered for every field of the type
    Type,
}

#[derive(Clone)]
pub struct ParserOverride {
    pub scope: OverrideScope,
    pub parse: ParseFn,
}

/// One declared field, normalized
#[derive(Clone)]
pub struct FieldDescriptor {
    /// The name as declared, marker included
    pub name: String,

    /// The argument name: `name` without its marker
    pub long: String,

    pub kind: FieldKind,

    /// The field's type, with any optional qualifier already unwrapped
    pub ty: TypeInfo,

    /// True if the field was declared with the optional qualifier
    pub optional: bool,

    pub default: Option<DefaultFn>,
    pub parser: Option<ParserOverride>,
    pub options: Option<Arc<[String]>>,
}

impl FieldDescriptor {
    /// The parser that will actually be applied to this field's token
    #[must_use]
    pub fn effective_parser(&self) -> &ParseFn {
        match self.parser {
            Some(ref parser) => &parser.parse,
            None => self.ty.constructor(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.kind == FieldKind::Named
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("long", &self.long)
            .field("kind", &self.kind)
            .field("ty", &self.ty)
            .field("optional", &self.optional)
            .field("default", &self.default.is_some())
            .field("parser", &self.parser.as_ref().map(|parser| parser.scope))
            .field("options", &self.options)
            .finish()
    }
}

/// Read every field of `schema`, in declaration order. An empty schema gives
/// an empty list.
pub fn read_fields(schema: &Schema) -> Vec<FieldDescriptor> {
    schema
        .fields()
        .iter()
        .map(|field| {
            let parser = match field.parser {
                Some(ref parse) => Some(ParserOverride {
                    scope: OverrideScope::Field,
                    parse: parse.clone(),
                }),
                None => schema
                    .type_parser_for(field.ty.id())
                    .map(|parse| ParserOverride {
                        scope: OverrideScope::Type,
                        parse: parse.clone(),
                    }),
            };

            tracing::debug!(
                field = %field.name,
                ty = field.ty.name(),
                parser = ?parser.as_ref().map(|parser| parser.scope),
                "read field"
            );

            FieldDescriptor {
                name: field.name.clone(),
                long: field.long.clone(),
                kind: field.kind,
                ty: field.ty.clone(),
                optional: field.optional,
                default: field.default.clone(),
                parser,
                options: field.options.clone(),
            }
        })
        .collect()
}
