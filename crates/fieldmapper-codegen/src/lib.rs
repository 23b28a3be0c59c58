extern crate proc_macro;

use fieldmapper_build::attr::TargetList;
use proc_macro_error::abort;
use quote::quote;
use syn::parse_macro_input;

mod expand;

use expand::Expansion;

/// Declare structs and generate `mapTo<Target>` methods for every struct
/// carrying `#[mapper(Target, ..)]`.
#[proc_macro]
#[proc_macro_error::proc_macro_error]
pub fn mappers(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
  let file = parse_macro_input!(tokens as syn::File);
  let expansion = Expansion::from_file(file);
  let tokens = quote!(#expansion);
  tokens.into()
}

/// Marks a mapping origin for `fieldmapper-build`. The item is left as is.
#[proc_macro_attribute]
#[proc_macro_error::proc_macro_error]
pub fn mapper(args: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
  if let Err(err) = syn::parse::<TargetList>(args) {
    abort!(err.span(), "{}", err);
  }
  item
}
