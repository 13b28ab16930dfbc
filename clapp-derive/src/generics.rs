use syn::{Generics, spanned::Spanned as _};

/// Bound values are owned and `'static`, so there's nothing for a generic
/// parameter of any kind to do.
pub fn reject_generics(generics: &Generics) -> syn::Result<()> {
    if let Some(param) = generics.const_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "const generics aren't supported by clapp",
        ));
    }

    if let Some(param) = generics.type_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "generic types aren't supported by clapp",
        ));
    }

    if let Some(param) = generics.lifetimes().next() {
        return Err(syn::Error::new(
            param.span(),
            "clapp structs own their fields, so they can't have lifetimes",
        ));
    }

    Ok(())
}
