//! Schema extraction from `syn` syntax trees.
//!
//! Declarations are collected through inline modules and identified by their
//! module path below a configured root (`crate::models`, or nothing for code
//! inside a macro invocation). Target paths in `#[mapper(..)]` resolve the way
//! Rust resolves paths written in the origin's module, without following
//! `use` imports. Field types naming a scanned declaration are rewritten the
//! same way, so `a::Money` and `b::Money` stay distinct and either can be
//! named where the generated `impl` lands.

use crate::attr::{is_mapper_attr, parse_targets};
use fieldmapper_core::{FieldSpec, Identity, MappingDirective, MappingError, RecordSchema, TypeSig};
use proc_macro2::Span;
use quote::ToTokens;
use std::collections::BTreeMap;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{Attribute, Fields, Item, ItemStruct, Path, TypePath};

enum DeclKind<'a> {
  Struct(&'a ItemStruct),
  Other(&'static str),
}

struct Declaration<'a> {
  identity: Identity,
  module: Vec<String>,
  attrs: &'a [Attribute],
  span: Span,
  kind: DeclKind<'a>,
}

/// Spans of declarations and target references, for diagnostics.
#[derive(Debug, Default)]
pub struct SpanIndex {
  declarations: BTreeMap<Identity, Span>,
  references: BTreeMap<(Identity, Identity), Span>,
}

impl SpanIndex {
  pub fn declaration(&self, identity: &Identity) -> Option<Span> {
    self.declarations.get(identity).copied()
  }

  /// Best span for a pass diagnostic: the target reference in the origin's
  /// attribute, else the declaration it is about.
  pub fn span_of(&self, err: &MappingError) -> Option<Span> {
    let origin = err.origin();
    match err.target() {
      Some(target) => self
        .references
        .get(&(origin.clone(), target.clone()))
        .or_else(|| self.declarations.get(target))
        .copied(),
      None => self.declarations.get(origin).copied(),
    }
  }
}

#[derive(Debug, Default)]
pub struct Extraction {
  pub directives: Vec<MappingDirective>,
  /// Attribute syntax errors. Directives are still built for valid attributes.
  pub errors: Vec<syn::Error>,
  pub spans: SpanIndex,
}

pub struct Extractor {
  root: Vec<String>,
}

impl Extractor {
  /// `root` is the module path the scanned items live in, `""` for none.
  pub fn new(root: &str) -> Self {
    Self {
      root: Identity::new(root).segments().map(String::from).collect(),
    }
  }

  pub fn extract_file(&self, file: &syn::File) -> Extraction {
    self.extract_items(&file.items)
  }

  pub fn extract_items(&self, items: &[Item]) -> Extraction {
    let mut declarations = vec![];
    collect(items, &mut vec![], &self.root, &mut declarations);

    let index: Index<'_, '_> = declarations.iter().map(|d| (&d.identity, d)).collect();
    let mut extraction = Extraction::default();
    for decl in &declarations {
      extraction.spans.declarations.insert(decl.identity.clone(), decl.span);
    }

    for decl in &declarations {
      let mut references = vec![];
      for attr in decl.attrs.iter().filter(|attr| is_mapper_attr(attr)) {
        match parse_targets(attr) {
          Ok(paths) => references.extend(paths),
          Err(err) => extraction.errors.push(err),
        }
      }
      if references.is_empty() {
        continue;
      }
      if let DeclKind::Other(kind) = decl.kind {
        extraction.errors.push(syn::Error::new(
          decl.span,
          format!("`#[mapper]` is not supported on {}", kind),
        ));
        continue;
      }

      let targets = references
        .iter()
        .map(|path| {
          let (identity, schema) = match self.resolve(&decl.module, path) {
            Some(identity) => {
              let schema = match index.get(&identity) {
                Some(target) => self.schema_of(target, &index),
                None => RecordSchema::unresolved(
                  identity.clone(),
                  format!("no struct named `{}` is declared", identity),
                ),
              };
              (identity, schema)
            }
            None => {
              let identity = Identity::from_segments(path.segments.iter().map(|s| s.ident.to_string()));
              let reason = format!("`{}` points above the scanned modules", identity);
              (identity.clone(), RecordSchema::unresolved(identity, reason))
            }
          };
          extraction
            .spans
            .references
            .insert((decl.identity.clone(), identity), path.span());
          schema
        })
        .collect();

      match MappingDirective::new(self.schema_of(decl, &index), targets) {
        Ok(directive) => extraction.directives.push(directive),
        Err(err) => extraction.errors.push(syn::Error::new(decl.span, err)),
      }
    }

    tracing::debug!(
      declarations = declarations.len(),
      directives = extraction.directives.len(),
      "extracted mapping directives"
    );
    extraction
  }

  /// Identity `path` names when written in `module`, or `None` for paths
  /// outside the scanned modules (`::extern`, `super` past the root).
  fn resolve(&self, module: &[String], path: &Path) -> Option<Identity> {
    if path.leading_colon.is_some() {
      return None;
    }
    let mut segments = path.segments.iter().map(|s| s.ident.to_string()).peekable();
    let mut resolved: Vec<String> = match segments.peek().map(String::as_str) {
      Some("crate") => vec![],
      _ => self.root.iter().chain(module).cloned().collect(),
    };
    if segments.peek().map(String::as_str) == Some("self") {
      segments.next();
    }
    while segments.peek().map(String::as_str) == Some("super") {
      segments.next();
      match resolved.last().map(String::as_str) {
        None | Some("crate") => return None,
        Some(_) => {
          resolved.pop();
        }
      }
    }
    resolved.extend(segments);
    Some(Identity::from_segments(resolved))
  }

  fn schema_of(&self, decl: &Declaration<'_>, index: &Index<'_, '_>) -> RecordSchema {
    let item = match decl.kind {
      DeclKind::Struct(item) => item,
      DeclKind::Other(kind) => {
        return RecordSchema::unresolved(decl.identity.clone(), format!("`{}` is {}, not a struct", decl.identity, kind))
      }
    };
    if !item.generics.params.is_empty() {
      return RecordSchema::unresolved(decl.identity.clone(), "generic structs are not supported");
    }
    let mut qualify = QualifyTypes {
      extractor: self,
      module: &decl.module,
      index,
    };
    let fields: Vec<FieldSpec> = match item.fields {
      Fields::Named(ref fields) => fields
        .named
        .iter()
        .filter_map(|field| {
          let ident = field.ident.as_ref()?;
          let mut ty = field.ty.clone();
          qualify.visit_type_mut(&mut ty);
          Some(FieldSpec::new(ident.to_string(), TypeSig::new(ty.to_token_stream().to_string())))
        })
        .collect(),
      Fields::Unit => vec![],
      Fields::Unnamed(_) => {
        return RecordSchema::unresolved(decl.identity.clone(), "tuple structs have no named fields")
      }
    };
    RecordSchema::new(decl.identity.clone(), fields)
      .unwrap_or_else(|err| RecordSchema::unresolved(decl.identity.clone(), err.to_string()))
  }
}

type Index<'i, 'a> = BTreeMap<&'i Identity, &'i Declaration<'a>>;

/// Rewrites type paths naming a scanned declaration to its full identity, so
/// field types compare and emit the same from any module.
struct QualifyTypes<'q, 'i, 'a> {
  extractor: &'q Extractor,
  module: &'q [String],
  index: &'q Index<'i, 'a>,
}

impl VisitMut for QualifyTypes<'_, '_, '_> {
  fn visit_type_path_mut(&mut self, node: &mut TypePath) {
    visit_mut::visit_type_path_mut(self, node);
    if node.qself.is_some() {
      return;
    }
    let identity = match self.extractor.resolve(self.module, &node.path) {
      Some(identity) if self.index.contains_key(&identity) => identity,
      _ => return,
    };
    let mut path: Path = match syn::parse_str(identity.as_str()) {
      Ok(path) => path,
      Err(_) => return,
    };
    if let (Some(last), Some(written)) = (path.segments.last_mut(), node.path.segments.last()) {
      last.arguments = written.arguments.clone();
    }
    node.path = path;
  }
}

fn collect<'a>(items: &'a [Item], module: &mut Vec<String>, root: &[String], out: &mut Vec<Declaration<'a>>) {
  for item in items {
    let (ident, attrs, kind) = match item {
      Item::Struct(v) => (&v.ident, &v.attrs[..], DeclKind::Struct(v)),
      Item::Enum(v) => (&v.ident, &v.attrs[..], DeclKind::Other("an enum")),
      Item::Union(v) => (&v.ident, &v.attrs[..], DeclKind::Other("a union")),
      Item::Type(v) => (&v.ident, &v.attrs[..], DeclKind::Other("a type alias")),
      Item::Mod(v) => {
        if let Some((_, ref content)) = v.content {
          module.push(v.ident.to_string());
          collect(content, module, root, out);
          module.pop();
        }
        continue;
      }
      _ => continue,
    };
    out.push(Declaration {
      identity: Identity::from_segments(root.iter().chain(module.iter()).chain(std::iter::once(&ident.to_string()))),
      module: module.clone(),
      attrs,
      span: ident.span(),
      kind,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use syn::parse_quote;

  fn example() -> syn::File {
    parse_quote! {
      #[mapper(sub::OriginModel, DestinationModel)]
      #[mapper(DestinationModel2)]
      pub struct OriginModel {
        pub id: i64,
        pub name: String,
        pub budget: i64,
        pub remains: Option<i64>,
        pub loan: Option<i64>,
      }

      pub struct DestinationModel {
        pub id: i64,
        pub name: String,
        pub budget: i64,
        pub remains: Option<i64>,
        pub loan: Option<i64>,
        pub rich: bool,
      }

      pub struct DestinationModel2 {
        pub id: i64,
        pub name: String,
        pub budget: i64,
        pub remains: Option<i64>,
        pub loan: Option<i64>,
        pub rich: bool,
        pub happy: Option<bool>,
      }

      pub mod sub {
        #[mapper(super::DestinationModel, self::Tuple, crate::models::Marker)]
        pub struct OriginModel {
          pub id: i64,
          pub name: String,
          pub budget: i64,
          pub remains: Option<i64>,
          pub loan: Option<i64>,
        }

        pub struct Tuple(i64);
      }

      pub struct Marker;
    }
  }

  fn identities(schemas: &[RecordSchema]) -> Vec<&str> {
    schemas.iter().map(|s| s.identity().as_str()).collect()
  }

  #[test]
  fn test_extract_with_root() {
    let extraction = Extractor::new("crate::models").extract_file(&example());
    assert!(extraction.errors.is_empty());
    assert_eq!(extraction.directives.len(), 2);

    let first = &extraction.directives[0];
    assert_eq!(first.origin().identity().as_str(), "crate::models::OriginModel");
    assert_eq!(
      identities(first.targets()),
      vec![
        "crate::models::sub::OriginModel",
        "crate::models::DestinationModel",
        "crate::models::DestinationModel2",
      ]
    );
    let remains = first.origin().field("remains").unwrap();
    assert_eq!(remains.ty().as_str(), quote::quote!(Option<i64>).to_string());

    let second = &extraction.directives[1];
    assert_eq!(second.origin().identity().as_str(), "crate::models::sub::OriginModel");
    assert_eq!(
      identities(second.targets()),
      vec![
        "crate::models::DestinationModel",
        "crate::models::sub::Tuple",
        "crate::models::Marker",
      ]
    );
    assert!(second.targets()[1].fields().is_none());
    assert_eq!(second.targets()[2].fields().map(<[_]>::len), Some(0));
  }

  #[test]
  fn test_extract_without_root() {
    let extraction = Extractor::new("").extract_file(&example());
    let second = &extraction.directives[1];
    assert_eq!(second.origin().identity().as_str(), "sub::OriginModel");
    assert_eq!(second.targets()[0].identity().as_str(), "DestinationModel");
    // `crate::` paths cannot be resolved without a crate-rooted module.
    assert_eq!(second.targets()[2].identity().as_str(), "crate::models::Marker");
    assert!(second.targets()[2].fields().is_none());
  }

  #[test]
  fn test_unresolvable_declarations() {
    let file: syn::File = parse_quote! {
      #[mapper(Missing, Generic, Kind, Alias)]
      struct Origin { id: i64 }
      struct Generic<T> { value: T }
      enum Kind { A }
      type Alias = Origin;
    };
    let extraction = Extractor::new("").extract_file(&file);
    let reasons: Vec<_> = extraction.directives[0]
      .targets()
      .iter()
      .map(|t| t.unresolved_reason().unwrap().to_string())
      .collect();
    assert_eq!(
      reasons,
      vec![
        "no struct named `Missing` is declared",
        "generic structs are not supported",
        "`Kind` is an enum, not a struct",
        "`Alias` is a type alias, not a struct",
      ]
    );
  }

  #[test]
  fn test_attribute_errors() {
    let file: syn::File = parse_quote! {
      #[mapper]
      #[mapper(Target)]
      struct Origin { id: i64 }
      #[mapper(Origin)]
      enum Kind { A }
      struct Target { id: i64 }
    };
    let extraction = Extractor::new("").extract_file(&file);
    assert_eq!(extraction.errors.len(), 2);
    assert_eq!(extraction.directives.len(), 1);
    assert_eq!(extraction.directives[0].targets()[0].identity().as_str(), "Target");
  }

  #[test]
  fn test_span_index() {
    let extraction = Extractor::new("").extract_file(&example());
    let err = MappingError::MalformedSchema {
      origin: "sub::OriginModel".into(),
      identity: "sub::Tuple".into(),
      reason: String::new(),
    };
    assert!(extraction.spans.span_of(&err).is_some());
    assert!(extraction.spans.declaration(&"DestinationModel2".into()).is_some());
    let unknown = MappingError::DuplicateOriginModule {
      origin: "Unknown".into(),
    };
    assert!(extraction.spans.span_of(&unknown).is_none());
  }

  #[test]
  fn test_same_type_name_in_two_modules() {
    let file: syn::File = parse_quote! {
      pub mod a {
        pub struct Money(pub i64);
        #[mapper(super::b::Target)]
        pub struct Origin {
          pub id: i64,
          pub m: Money,
        }
      }
      pub mod b {
        pub struct Money(pub u8);
        pub struct Target {
          pub id: i64,
          pub m: Money,
        }
      }
    };
    let extraction = Extractor::new("").extract_file(&file);
    let directive = &extraction.directives[0];
    assert_eq!(
      directive.origin().field("m").map(|f| f.ty().as_str().to_string()),
      Some(quote::quote!(a::Money).to_string())
    );

    let output = fieldmapper_core::generate(&extraction.directives);
    assert!(output.is_clean());
    let function = output.modules[0].function("mapToTarget").unwrap();
    let m = function.parameter("m").unwrap();
    assert!(m.is_required());
    assert_eq!(m.ty().as_str(), quote::quote!(b::Money).to_string());
    assert!(!function.parameter("id").unwrap().is_required());
  }

  #[test]
  fn test_module_local_field_types_are_qualified() {
    let file: syn::File = parse_quote! {
      pub mod ledger {
        pub struct Money(pub i64);
        #[mapper(Statement)]
        pub struct Account {
          pub balance: Money,
          pub history: Vec<Money>,
          pub note: Option<String>,
        }
        pub struct Statement {
          pub balance: self::Money,
          pub history: Vec<Money>,
          pub closed: bool,
        }
      }
    };
    let extraction = Extractor::new("crate::models").extract_file(&file);
    let target = &extraction.directives[0].targets()[0];
    let ty = |name: &str| target.field(name).map(|f| f.ty().as_str().to_string());
    assert_eq!(ty("balance"), Some(quote::quote!(crate::models::ledger::Money).to_string()));
    assert_eq!(ty("history"), Some(quote::quote!(Vec<crate::models::ledger::Money>).to_string()));
    assert_eq!(ty("closed"), Some(quote::quote!(bool).to_string()));

    let origin = extraction.directives[0].origin();
    assert_eq!(
      origin.field("note").map(|f| f.ty().as_str().to_string()),
      Some(quote::quote!(Option<String>).to_string())
    );

    let output = fieldmapper_core::generate(&extraction.directives);
    let function = output.modules[0].function("mapToStatement").unwrap();
    assert!(!function.parameter("balance").unwrap().is_required());
    assert!(!function.parameter("history").unwrap().is_required());
  }

  #[test]
  fn test_super_above_root() {
    let file: syn::File = parse_quote! {
      #[mapper(super::Target)]
      pub struct Origin { pub id: i64 }
      pub struct Target { pub id: i64 }
    };
    let extraction = Extractor::new("").extract_file(&file);
    let target = &extraction.directives[0].targets()[0];
    assert_eq!(target.identity().as_str(), "super::Target");
    assert_eq!(
      target.unresolved_reason(),
      Some("`super::Target` points above the scanned modules")
    );

    let file: syn::File = parse_quote! {
      #[mapper(super::super::Target)]
      pub struct Origin { pub id: i64 }
    };
    let extraction = Extractor::new("crate::models").extract_file(&file);
    assert!(extraction.directives[0].targets()[0].fields().is_none());

    let output = fieldmapper_core::generate(&extraction.directives);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(extraction.spans.span_of(&output.diagnostics[0]).is_some());
  }
}
