use darling::FromAttributes as _;
use itertools::Itertools as _;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::ToTokens;
use syn::{
    Attribute, Expr, Field, GenericArgument, Ident, PathArguments, Type, ext::IdentExt as _,
    spanned::Spanned as _,
};

/// A field name is named (rather than positional) if it ends with this
pub const MARKER: char = '_';

pub struct IdentString<'a> {
    raw: &'a Ident,
    string: String,
}

impl<'a> IdentString<'a> {
    pub fn new(ident: &'a Ident) -> Self {
        Self {
            string: ident.unraw().to_string(),
            raw: ident,
        }
    }

    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

    pub fn span(&self) -> Span {
        self.raw.span()
    }
}

impl ToTokens for IdentString<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        self.raw.to_tokens(tokens);
    }
}

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(clapp))]
struct RawParsedAttr {
    named: Option<()>,
    #[darling(default)]
    default: FieldDefault,
    parser: Option<Expr>,
    options: Option<Expr>,
}

/// `#[clapp(default)]` uses `Default::default`; `#[clapp(default = expr)]`
/// takes any expression, kept exactly as written.
#[derive(Debug, Default)]
pub enum FieldDefault {
    #[default]
    None,
    Trait,
    Expr(Expr),
}

impl darling::FromMeta for FieldDefault {
    fn from_meta(item: &syn::Meta) -> darling::Result<Self> {
        match *item {
            syn::Meta::Path(_) => Ok(Self::Trait),
            syn::Meta::NameValue(ref meta) => Ok(Self::Expr(meta.value.clone())),
            syn::Meta::List(ref list) => {
                Err(darling::Error::unsupported_format("list").with_span(list))
            }
        }
    }
}

impl FieldDefault {
    pub fn is_some(&self) -> bool {
        !matches!(*self, FieldDefault::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Positional,
    Named,
}

pub struct ParsedFieldInfo<'a> {
    pub ident: IdentString<'a>,

    /// The argument name: the field name without its marker
    pub long: String,
    pub kind: FieldKind,

    /// The field's type, with `Option` unwrapped
    pub ty: &'a Type,
    pub optional: bool,

    pub default: FieldDefault,
    pub parser: Option<Expr>,
    pub options: Option<Expr>,
}

impl<'a> ParsedFieldInfo<'a> {
    pub fn from_field(field: &'a Field) -> syn::Result<Self> {
        let parsed = RawParsedAttr::from_attributes(&field.attrs)?;

        let ident = field
            .ident
            .as_ref()
            .map(IdentString::new)
            .ok_or_else(|| syn::Error::new(field.span(), "fields must be named"))?;

        let marked = ident.as_str().ends_with(MARKER);

        let kind = match marked || parsed.named.is_some() {
            true => FieldKind::Named,
            false => FieldKind::Positional,
        };

        let long = compute_long(&ident, kind)?;
        let default = parsed.default;

        if kind == FieldKind::Positional && default.is_some() {
            return Err(syn::Error::new(
                ident.span(),
                "positional fields are always required, so they can't have a default; \
                add a trailing `_` to make this field named",
            ));
        }

        let (ty, optional) = match unwrap_option(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };

        Ok(Self {
            ident,
            long,
            kind,
            ty,
            optional,
            default,
            parser: parsed.parser,
            options: parsed.options,
        })
    }
}

fn compute_long(ident: &IdentString<'_>, kind: FieldKind) -> syn::Result<String> {
    let long = match kind {
        FieldKind::Named => ident.as_str().strip_suffix(MARKER).unwrap_or(ident.as_str()),
        FieldKind::Positional => ident.as_str(),
    };

    if long.is_empty() {
        Err(syn::Error::new(
            ident.span(),
            "named fields need a name besides the trailing `_`",
        ))
    } else {
        Ok(long.to_owned())
    }
}

/// If `ty` is spelled `Option<T>` (or `std::option::Option<T>`, etc), get `T`
fn unwrap_option(ty: &Type) -> Option<&Type> {
    let Type::Path(ref path) = *ty else {
        return None;
    };

    if path.qself.is_some() {
        return None;
    }

    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }

    let PathArguments::AngleBracketed(ref arguments) = segment.arguments else {
        return None;
    };

    match arguments.args.iter().exactly_one() {
        Ok(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// Collect the `///` comments on an item into a single string
pub fn compute_docs(attrs: &[Attribute]) -> syn::Result<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| match attr.meta {
            syn::Meta::NameValue(ref meta) => Some(meta),
            _ => None,
        })
        .filter(|meta| meta.path.is_ident("doc"))
        .map(|meta| match meta.value {
            Expr::Lit(ref lit) => match lit.lit {
                syn::Lit::Str(ref lit) => Ok(lit.value()),
                _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
            },
            Expr::Macro(ref expr) => Err(syn::Error::new(
                expr.span(),
                "macro #[doc] attributes aren't supported",
            )),
            _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
        })
        .try_collect()?;

    Ok(lines
        .iter()
        .map(|line| line.strip_prefix(' ').unwrap_or(line))
        .join("\n")
        .trim()
        .to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn unwrapped(ty: Type) -> Option<String> {
        unwrap_option(&ty).map(|inner| inner.to_token_stream().to_string())
    }

    #[test]
    fn option_is_unwrapped() {
        assert_eq!(unwrapped(parse_quote!(Option<String>)).as_deref(), Some("String"));
        assert_eq!(
            unwrapped(parse_quote!(::core::option::Option<u8>)).as_deref(),
            Some("u8")
        );
        assert_eq!(unwrapped(parse_quote!(Vec<String>)), None);
    }

    #[test]
    fn field_kinds() {
        let field: Field = parse_quote!(rate_: f64);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert_eq!(info.kind, FieldKind::Named);
        assert_eq!(info.long, "rate");

        let field: Field = parse_quote!(#[clapp(named)] verbose: bool);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert_eq!(info.kind, FieldKind::Named);
        assert_eq!(info.long, "verbose");

        let field: Field = parse_quote!(r#type: String);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert_eq!(info.kind, FieldKind::Positional);
        assert_eq!(info.long, "type");
    }

    #[test]
    fn defaults_take_any_expression() {
        let field: Field = parse_quote!(#[clapp(default = 4)] jobs_: u8);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert!(matches!(info.default, FieldDefault::Expr(Expr::Lit(_))));

        let field: Field = parse_quote!(#[clapp(default = String::new())] name_: String);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert!(matches!(info.default, FieldDefault::Expr(Expr::Call(_))));

        let field: Field = parse_quote!(#[clapp(default)] retries_: u32);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert!(matches!(info.default, FieldDefault::Trait));

        let field: Field = parse_quote!(label_: String);
        let info = ParsedFieldInfo::from_field(&field).unwrap();
        assert!(matches!(info.default, FieldDefault::None));
    }

    #[test]
    fn positional_default_rejected() {
        let field: Field = parse_quote!(#[clapp(default = 3)] count: i32);
        assert!(ParsedFieldInfo::from_field(&field).is_err());
    }

    #[test]
    fn docs_are_joined() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = " First line."]),
            parse_quote!(#[doc = " Second line."]),
        ];
        assert_eq!(compute_docs(&attrs).unwrap(), "First line.\nSecond line.");
    }
}
