use fieldmapper_build::attr::strip_mapper_attrs;
use fieldmapper_build::emit;
use fieldmapper_build::Extractor;
use proc_macro2::{Span, TokenStream};
use proc_macro_error::{abort, abort_call_site, emit_error};
use quote::{quote, ToTokens};

#[derive(Debug)]
pub struct Expansion {
  items: Vec<syn::Item>,
  generated: Vec<TokenStream>,
}

impl Expansion {
  pub fn from_file(file: syn::File) -> Self {
    if let Some(attr) = file.attrs.first() {
      abort!(attr, "Inner attributes are not supported in `mappers!`.");
    }
    let mut items = file.items;

    let extraction = Extractor::new("").extract_items(&items);
    for err in &extraction.errors {
      emit_error!(err.span(), "{}", err);
    }

    let output = fieldmapper_core::generate(&extraction.directives);
    for diagnostic in &output.diagnostics {
      let span = extraction
        .spans
        .span_of(diagnostic)
        .unwrap_or_else(Span::call_site);
      emit_error!(span, "{}", diagnostic);
    }

    let generated = output
      .modules
      .iter()
      .map(emit::module_tokens)
      .collect::<Result<Vec<_>, _>>()
      .unwrap_or_else(|err| abort_call_site!("{}", err));

    strip_mapper_attrs(&mut items);
    Self { items, generated }
  }
}

impl ToTokens for Expansion {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let items = &self.items;
    let generated = &self.generated;
    tokens.extend(quote! {
      #(#items)*
      #(#generated)*
    });
  }
}
