/*!
`#[derive(FromArgs)]` for the `clapp` command-line binder. See the `clapp`
crate for documentation.
*/

mod common;
mod from_args;
mod generics;

use proc_macro::TokenStream;

#[proc_macro_derive(FromArgs, attributes(clapp))]
pub fn derive_from_args(item: TokenStream) -> TokenStream {
    match from_args::derive_from_args_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
