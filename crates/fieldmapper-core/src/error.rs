use crate::schema::Identity;
use thiserror::Error;

/// Precondition violations while building schemas and directives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
  #[error("Field `{field}` is declared more than once in `{identity}`")]
  DuplicateField { identity: Identity, field: String },
  #[error("Mapping directive on `{origin}` declares no target")]
  EmptyDirective { origin: Identity },
}

/// Diagnostics produced by a generation pass.
///
/// None of these abort the pass: each is attached to the directive or target
/// it concerns and the remaining work proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
  #[error("`{identity}` has no accessible field list: {reason}")]
  MalformedSchema {
    origin: Identity,
    identity: Identity,
    reason: String,
  },
  #[error("`{target}` appears more than once in the targets of `{origin}`")]
  DuplicateTargetInDirective { origin: Identity, target: Identity },
  #[error("`{target}` and `{first}` both generate `{origin}::{name}`")]
  FunctionNameCollision {
    origin: Identity,
    name: String,
    first: Identity,
    target: Identity,
  },
  #[error("`{origin}` is declared as a mapping origin more than once")]
  DuplicateOriginModule { origin: Identity },
}

impl MappingError {
  /// The origin whose directive this diagnostic belongs to.
  pub fn origin(&self) -> &Identity {
    match self {
      MappingError::MalformedSchema { origin, .. }
      | MappingError::DuplicateTargetInDirective { origin, .. }
      | MappingError::FunctionNameCollision { origin, .. }
      | MappingError::DuplicateOriginModule { origin } => origin,
    }
  }

  /// The target concerned, if the diagnostic is about a single target.
  pub fn target(&self) -> Option<&Identity> {
    match self {
      MappingError::MalformedSchema { origin, identity, .. } => {
        if identity == origin {
          None
        } else {
          Some(identity)
        }
      }
      MappingError::DuplicateTargetInDirective { target, .. }
      | MappingError::FunctionNameCollision { target, .. } => Some(target),
      MappingError::DuplicateOriginModule { .. } => None,
    }
  }
}
