//! Rendering of generated modules as Rust items.
//!
//! A module becomes an inherent `impl` on its origin. Rust has no default
//! arguments, so a defaulted parameter is taken as `Option<T>` and `None`
//! falls back to a clone of the receiver's field.

use fieldmapper_core::{DefaultValue, GeneratedFunction, GeneratedModule, Identity, TypeSig};
use proc_macro2::TokenStream;
use quote::quote;
use thiserror::Error;

pub const HEADER: &str = "// Generated by fieldmapper. Do not edit.\n";

#[derive(Debug, Clone, Error)]
pub enum EmitError {
  #[error("`{0}` is not a valid Rust path")]
  InvalidPath(Identity),
  #[error("`{0}` is not a valid Rust type")]
  InvalidType(TypeSig),
  #[error("`{0}` is not a valid Rust identifier")]
  InvalidIdent(String),
  #[error("Generated code is invalid: {0}")]
  InvalidOutput(String),
}

fn path(identity: &Identity) -> Result<syn::Path, EmitError> {
  syn::parse_str(identity.as_str()).map_err(|_| EmitError::InvalidPath(identity.clone()))
}

fn ty(sig: &TypeSig) -> Result<syn::Type, EmitError> {
  syn::parse_str(sig.as_str()).map_err(|_| EmitError::InvalidType(sig.clone()))
}

fn ident(name: &str) -> Result<syn::Ident, EmitError> {
  syn::parse_str(name).map_err(|_| EmitError::InvalidIdent(name.to_string()))
}

pub fn function_tokens(function: &GeneratedFunction) -> Result<TokenStream, EmitError> {
  let name = ident(function.name())?;
  let returns = path(function.returns())?;

  let mut params = vec![];
  let mut fallbacks = vec![];
  for param in function.parameters() {
    let param_ident = ident(param.name())?;
    let param_ty = ty(param.ty())?;
    match param.default() {
      None => params.push(quote! { #param_ident: #param_ty }),
      Some(DefaultValue::OriginField(field)) => {
        let field = ident(field)?;
        params.push(quote! { #param_ident: ::core::option::Option<#param_ty> });
        fallbacks.push(quote! {
          let #param_ident = #param_ident.unwrap_or_else(|| ::core::clone::Clone::clone(&self.#field));
        });
      }
    }
  }

  let inits = function
    .body()
    .fields()
    .iter()
    .map(|init| {
      let field = ident(init.field())?;
      if init.field() == init.parameter() {
        Ok(quote! { #field })
      } else {
        let param = ident(init.parameter())?;
        Ok(quote! { #field: #param })
      }
    })
    .collect::<Result<Vec<_>, EmitError>>()?;

  let doc = format!(
    " Maps this `{}` into a `{}`. Optional arguments left as `None` reuse the field of the same name.",
    function.receiver().simple_name(),
    function.returns().simple_name()
  );

  Ok(quote! {
    #[doc = #doc]
    #[allow(non_snake_case, clippy::too_many_arguments)]
    pub fn #name(&self, #(#params),*) -> #returns {
      #(#fallbacks)*
      #returns {
        #(#inits),*
      }
    }
  })
}

/// One `impl` block for the origin; empty for a module without functions.
pub fn module_tokens(module: &GeneratedModule) -> Result<TokenStream, EmitError> {
  if module.is_empty() {
    return Ok(TokenStream::new());
  }
  let origin = path(module.origin())?;
  let functions = module
    .functions()
    .iter()
    .map(function_tokens)
    .collect::<Result<Vec<_>, _>>()?;
  Ok(quote! {
    #[automatically_derived]
    impl #origin {
      #(#functions)*
    }
  })
}

/// Formatted source for `modules`, behind the generated-file header.
pub fn render(modules: &[GeneratedModule]) -> Result<String, EmitError> {
  let items = modules
    .iter()
    .map(module_tokens)
    .collect::<Result<Vec<_>, _>>()?;
  let file: syn::File = syn::parse2(quote! { #(#items)* }).map_err(|err| EmitError::InvalidOutput(err.to_string()))?;
  Ok(format!("{}\n{}", HEADER, prettyplease::unparse(&file)))
}
