use std::collections::{HashMap, hash_map::Entry};

use darling::{FromAttributes as _, util::SpannedValue};
use itertools::Itertools as _;
use lazy_format::lazy_format;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    Attribute, DeriveInput, Expr, Field, Fields, Ident, Path, Token, punctuated::Punctuated,
    spanned::Spanned as _,
};

use crate::common::{FieldDefault, FieldKind, ParsedFieldInfo, compute_docs};
use crate::generics::reject_generics;

#[derive(darling::FromMeta, Debug)]
struct TypeParserAttr {
    ty: Path,
    with: Expr,
}

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(clapp))]
struct RawParsedTypeAttr {
    #[darling(multiple)]
    type_parser: Vec<TypeParserAttr>,
    init: Option<Path>,

    prog: Option<String>,
    usage: Option<String>,
    description: Option<String>,
    epilog: Option<String>,

    no_help: Option<()>,
    no_abbrev: Option<()>,
    conflict_handler: Option<SpannedValue<String>>,
    no_exit_on_error: Option<()>,
}

fn detect_collision(known: &mut HashMap<String, Span>, name: &str, span: Span) -> syn::Result<()> {
    match known.entry(name.to_owned()) {
        Entry::Occupied(entry) => {
            let mut err1 = syn::Error::new(
                span,
                lazy_format!("more than one field binds to the argument {:?}", name),
            );
            let err2 = syn::Error::new(*entry.get(), "original use here");

            err1.combine(err2);
            Err(err1)
        }
        Entry::Vacant(entry) => {
            entry.insert(span);
            Ok(())
        }
    }
}

fn settings_block(attr: &RawParsedTypeAttr, attrs: &[Attribute]) -> syn::Result<TokenStream2> {
    let docs = compute_docs(attrs)?;

    let description = attr
        .description
        .clone()
        .or_else(|| (!docs.is_empty()).then_some(docs));

    let prog = attr.prog.as_ref().map(|prog| quote! { .prog(#prog) });
    let usage = attr.usage.as_ref().map(|usage| quote! { .usage(#usage) });
    let description = description.map(|description| quote! { .description(#description) });
    let epilog = attr.epilog.as_ref().map(|epilog| quote! { .epilog(#epilog) });

    let add_help = attr.no_help.map(|()| quote! { .add_help(false) });
    let allow_abbrev = attr.no_abbrev.map(|()| quote! { .allow_abbrev(false) });
    let exit_on_error = attr.no_exit_on_error.map(|()| quote! { .exit_on_error(false) });

    let conflict_handler = attr
        .conflict_handler
        .as_ref()
        .map(|handler| match handler.as_str() {
            "error" => Ok(quote! { ::clapp::ConflictHandler::Error }),
            "resolve" => Ok(quote! { ::clapp::ConflictHandler::Resolve }),
            _ => Err(syn::Error::new(
                handler.span(),
                "conflict_handler must be \"error\" or \"resolve\"",
            )),
        })
        .transpose()?
        .map(|handler| quote! { .conflict_handler(#handler) });

    Ok(quote! {
        ::clapp::Settings::new()
            #prog
            #usage
            #description
            #epilog
            #add_help
            #allow_abbrev
            #conflict_handler
            #exit_on_error
    })
}

fn field_declaration(field: &ParsedFieldInfo<'_>) -> TokenStream2 {
    let name = field.ident.as_str();
    let ty = field.ty;

    let method = match field.optional {
        true => quote! { optional },
        false => quote! { field },
    };

    let named = (field.kind == FieldKind::Named).then(|| quote! { .named() });
    let parser = field.parser.as_ref().map(|parser| quote! { .parser(#parser) });
    let options = field.options.as_ref().map(|options| quote! { .options(#options) });

    let default = match field.default {
        FieldDefault::None => None,
        FieldDefault::Trait => {
            Some(quote! { .default_with(<#ty as ::core::default::Default>::default) })
        }
        FieldDefault::Expr(ref expr) => Some(quote! { .default_with(|| #expr) }),
    };

    quote! {
        schema.#method::<#ty>(#name) #named #parser #options #default;
    }
}

fn field_initializer(field: &ParsedFieldInfo<'_>, bound: &Ident) -> TokenStream2 {
    let ident = &field.ident;
    let name = field.ident.as_str();
    let ty = field.ty;

    match field.optional {
        true => quote! { #ident: #bound.take_optional::<#ty>(#name)? },
        false => quote! { #ident: #bound.take::<#ty>(#name)? },
    }
}

pub fn derive_from_args_struct(
    name: &Ident,
    fields: &Punctuated<Field, Token![,]>,
    attrs: &[Attribute],
) -> syn::Result<TokenStream2> {
    let attr = RawParsedTypeAttr::from_attributes(attrs)?;

    let fields: Vec<ParsedFieldInfo> = fields
        .iter()
        .map(ParsedFieldInfo::from_field)
        .try_collect()?;

    {
        let mut known = HashMap::new();

        for field in &fields {
            detect_collision(&mut known, &field.long, field.ident.span())?;
        }
    }

    let settings = settings_block(&attr, attrs)?;

    let type_parsers = attr.type_parser.iter().map(|TypeParserAttr { ty, with }| {
        quote! { schema.type_parser::<#ty, _>(#with); }
    });

    let declarations = fields.iter().map(field_declaration);

    let bound = Ident::new("bound", Span::mixed_site());
    let initializers = fields
        .iter()
        .map(|field| field_initializer(field, &bound));

    let build = match attr.init {
        Some(ref init) => quote! {
            let mut this = Self { #(#initializers,)* };
            #init(&mut this);
        },
        None => quote! {
            let this = Self { #(#initializers,)* };
        },
    };

    Ok(quote! {
        impl ::clapp::FromArgs for #name {
            fn schema() -> ::clapp::Schema {
                let mut schema = ::clapp::Schema::new();

                #(#type_parsers)*
                #(#declarations)*

                schema
            }

            fn settings() -> ::clapp::Settings {
                #settings
            }

            fn from_bound(
                #[allow(unused_mut, unused_variables)]
                mut #bound: ::clapp::Bound
            ) -> ::core::result::Result<Self, ::clapp::FieldError> {
                #build
                ::core::result::Result::Ok(this)
            }
        }
    })
}

pub fn derive_from_args_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;
    reject_generics(&input.generics)?;

    match input.data {
        syn::Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => {
                derive_from_args_struct(&input.ident, &fields.named, &input.attrs)
            }
            Fields::Unnamed(ref fields) => Err(syn::Error::new(
                fields.span(),
                "can't derive `FromArgs` on a tuple struct; argument names come from field names",
            )),
            Fields::Unit => Err(syn::Error::new(
                input.span(),
                "can't derive `FromArgs` on a unit struct",
            )),
        },
        syn::Data::Enum(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `FromArgs` on an enum",
        )),
        syn::Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `FromArgs` on a union",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn derive(input: TokenStream2) -> syn::Result<String> {
        derive_from_args_result(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn duplicate_argument_names() {
        let err = derive(quote! {
            struct Arguments {
                rate: f64,
                rate_: f64,
            }
        })
        .unwrap_err();

        assert!(err.to_string().contains("more than one field"));
    }

    #[test]
    fn rejects_non_structs() {
        assert!(derive(quote! { enum Mode { Fast, Slow } }).is_err());
        assert!(derive(quote! { struct Pair(i32, i32); }).is_err());
        assert!(derive(quote! { struct Wrapper<T> { value_: T } }).is_err());
    }

    #[test]
    fn defaults_expand_verbatim() {
        let expanded = derive(quote! {
            struct Arguments {
                #[clapp(default = 4)]
                jobs_: u8,

                #[clapp(default = String::new())]
                name_: String,

                #[clapp(default = true)]
                color_: bool,
            }
        })
        .unwrap();

        assert!(expanded.contains("default_with (|| 4)"));
        assert!(expanded.contains("default_with (|| String :: new ())"));
        assert!(expanded.contains("default_with (|| true)"));
    }

    #[test]
    fn named_fields_are_marked_named() {
        let expanded = derive(quote! {
            struct Arguments {
                input: String,

                #[clapp(named)]
                verbose: bool,
            }
        })
        .unwrap();

        assert!(expanded.contains("field :: < bool > (\"verbose\") . named ()"));
        assert!(!expanded.contains("(\"input\") . named ()"));
    }

    #[test]
    fn bad_conflict_handler() {
        let err = derive(quote! {
            #[clapp(conflict_handler = "ignore")]
            struct Arguments {
                value: i32,
            }
        })
        .unwrap_err();

        assert!(err.to_string().contains("conflict_handler"));
    }

    #[test]
    fn docs_become_description() {
        let attr = RawParsedTypeAttr::from_attributes(&[]).unwrap();
        let attrs: Vec<Attribute> = vec![parse_quote!(#[doc = " Adds numbers."])];

        let settings = settings_block(&attr, &attrs).unwrap().to_string();
        assert!(settings.contains("\"Adds numbers.\""));
    }
}
