use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;

const PATH_SEPARATOR: &str = "::";

/// Namespace-qualified name of a record, segments separated by `::`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
  pub fn new<S: Into<String>>(value: S) -> Self {
    Self(value.into())
  }

  /// Build an identity from path segments, skipping empty ones.
  pub fn from_segments<I, S>(segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let joined = segments
      .into_iter()
      .filter(|s| !s.as_ref().is_empty())
      .map(|s| s.as_ref().to_string())
      .collect::<Vec<_>>()
      .join(PATH_SEPARATOR);
    Self(joined)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn segments(&self) -> impl Iterator<Item = &str> {
    self.0.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
  }

  /// Last path segment, without a raw identifier prefix.
  pub fn simple_name(&self) -> &str {
    let last = self.0.rsplit(PATH_SEPARATOR).next().unwrap_or(&self.0);
    last.strip_prefix("r#").unwrap_or(last)
  }

  /// Everything before the last segment, if any.
  pub fn namespace(&self) -> Option<&str> {
    self.0.rfind(PATH_SEPARATOR).map(|pos| &self.0[..pos])
  }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Identity {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Identity {
  fn from(value: String) -> Self {
    Self(value)
  }
}

/// A type signature compared by exact structural equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSig(String);

impl TypeSig {
  pub fn new<S: Into<String>>(value: S) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TypeSig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for TypeSig {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&str> for TypeSig {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
  name: String,
  ty: TypeSig,
}

impl FieldSpec {
  pub fn new<S: Into<String>, T: Into<TypeSig>>(name: S, ty: T) -> Self {
    Self {
      name: name.into(),
      ty: ty.into(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn ty(&self) -> &TypeSig {
    &self.ty
  }

  /// Structural match: same name and same type signature.
  pub fn matches(&self, other: &FieldSpec) -> bool {
    self.name == other.name && self.ty == other.ty
  }
}

/// Field list of a record as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldList {
  Resolved(Vec<FieldSpec>),
  /// The declaration could not provide a field list.
  Unresolved { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecordSchema")]
pub struct RecordSchema {
  identity: Identity,
  fields: FieldList,
}

#[derive(Deserialize)]
struct RawRecordSchema {
  identity: Identity,
  fields: FieldList,
}

impl TryFrom<RawRecordSchema> for RecordSchema {
  type Error = SchemaError;

  fn try_from(raw: RawRecordSchema) -> Result<Self, Self::Error> {
    match raw.fields {
      FieldList::Resolved(fields) => Self::new(raw.identity, fields),
      FieldList::Unresolved { reason } => Ok(Self::unresolved(raw.identity, reason)),
    }
  }
}

impl RecordSchema {
  /// Build a resolved schema. Field names must be unique.
  pub fn new<I: Into<Identity>>(identity: I, fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
    let identity = identity.into();
    let mut seen = BTreeSet::new();
    for field in &fields {
      if !seen.insert(field.name()) {
        return Err(SchemaError::DuplicateField {
          identity,
          field: field.name().to_string(),
        });
      }
    }
    Ok(Self {
      identity,
      fields: FieldList::Resolved(fields),
    })
  }

  pub fn unresolved<I: Into<Identity>, S: Into<String>>(identity: I, reason: S) -> Self {
    Self {
      identity: identity.into(),
      fields: FieldList::Unresolved {
        reason: reason.into(),
      },
    }
  }

  pub fn identity(&self) -> &Identity {
    &self.identity
  }

  /// Declared fields, or `None` when the schema is unresolved.
  pub fn fields(&self) -> Option<&[FieldSpec]> {
    match self.fields {
      FieldList::Resolved(ref fields) => Some(fields),
      FieldList::Unresolved { .. } => None,
    }
  }

  pub fn unresolved_reason(&self) -> Option<&str> {
    match self.fields {
      FieldList::Resolved(_) => None,
      FieldList::Unresolved { ref reason } => Some(reason),
    }
  }

  pub fn field(&self, name: &str) -> Option<&FieldSpec> {
    self.fields()?.iter().find(|f| f.name() == name)
  }
}
