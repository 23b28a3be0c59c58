use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::visit_mut::{self, VisitMut};
use syn::{Attribute, Meta, Path, PathArguments, Token};

pub const ATTR_NAME: &str = "mapper";
const CRATE_NAME: &str = "fieldmapper";

/// Whether `attr` is `#[mapper(..)]` or `#[fieldmapper::mapper(..)]`.
pub fn is_mapper_attr(attr: &Attribute) -> bool {
  let path = attr.path();
  if path.leading_colon.is_some() {
    return path.segments.len() == 2 && path.segments[0].ident == CRATE_NAME && path.segments[1].ident == ATTR_NAME;
  }
  match path.segments.len() {
    1 => path.segments[0].ident == ATTR_NAME,
    2 => path.segments[0].ident == CRATE_NAME && path.segments[1].ident == ATTR_NAME,
    _ => false,
  }
}

/// Target list of a mapping attribute: `Target, path::Target, ..`
#[derive(Debug)]
pub struct TargetList {
  pub targets: Vec<Path>,
}

impl Parse for TargetList {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let paths = Punctuated::<Path, Token![,]>::parse_terminated(input)?;
    if paths.is_empty() {
      return Err(input.error("expected at least one target type"));
    }
    for path in &paths {
      if let Some(colon) = path.leading_colon {
        return Err(syn::Error::new_spanned(colon, "absolute paths are not supported as mapping targets"));
      }
      if let Some(segment) = path.segments.iter().find(|s| !matches!(s.arguments, PathArguments::None)) {
        return Err(syn::Error::new_spanned(segment, "generic arguments are not supported in mapping targets"));
      }
    }
    Ok(Self {
      targets: paths.into_iter().collect(),
    })
  }
}

/// Targets declared by one mapping attribute.
pub fn parse_targets(attr: &Attribute) -> syn::Result<Vec<Path>> {
  match attr.meta {
    Meta::List(ref list) => Ok(list.parse_args::<TargetList>()?.targets),
    Meta::Path(ref path) => Err(syn::Error::new_spanned(path, "expected `#[mapper(Target, ..)]`")),
    Meta::NameValue(ref v) => Err(syn::Error::new_spanned(v, "expected `#[mapper(Target, ..)]`")),
  }
}

struct StripMapperAttrs;

impl StripMapperAttrs {
  fn strip(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !is_mapper_attr(attr));
  }
}

impl VisitMut for StripMapperAttrs {
  fn visit_item_struct_mut(&mut self, node: &mut syn::ItemStruct) {
    Self::strip(&mut node.attrs);
    visit_mut::visit_item_struct_mut(self, node);
  }

  fn visit_item_enum_mut(&mut self, node: &mut syn::ItemEnum) {
    Self::strip(&mut node.attrs);
    visit_mut::visit_item_enum_mut(self, node);
  }

  fn visit_item_union_mut(&mut self, node: &mut syn::ItemUnion) {
    Self::strip(&mut node.attrs);
    visit_mut::visit_item_union_mut(self, node);
  }
}

/// Remove mapping attributes from items, including inline modules.
pub fn strip_mapper_attrs(items: &mut [syn::Item]) {
  for item in items {
    StripMapperAttrs.visit_item_mut(item);
  }
}
