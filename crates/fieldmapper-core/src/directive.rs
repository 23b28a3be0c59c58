use crate::error::SchemaError;
use crate::schema::RecordSchema;

/// One origin and the ordered targets to generate mappers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDirective {
  origin: RecordSchema,
  targets: Vec<RecordSchema>,
}

impl MappingDirective {
  pub fn new(origin: RecordSchema, targets: Vec<RecordSchema>) -> Result<Self, SchemaError> {
    if targets.is_empty() {
      return Err(SchemaError::EmptyDirective {
        origin: origin.identity().clone(),
      });
    }
    Ok(Self { origin, targets })
  }

  pub fn single(origin: RecordSchema, target: RecordSchema) -> Self {
    Self {
      origin,
      targets: vec![target],
    }
  }

  pub fn origin(&self) -> &RecordSchema {
    &self.origin
  }

  /// Never empty.
  pub fn targets(&self) -> &[RecordSchema] {
    &self.targets
  }
}
