use crate::schema::{FieldSpec, Identity, RecordSchema};

/// How a single target field gets its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
  /// No structural match in the origin; the caller supplies the value.
  Explicit,
  /// Defaults to the origin field of this name.
  Defaulted { origin_field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFieldBinding {
  field: FieldSpec,
  binding: Binding,
}

impl TargetFieldBinding {
  pub fn field(&self) -> &FieldSpec {
    &self.field
  }

  pub fn binding(&self) -> &Binding {
    &self.binding
  }

  pub fn is_defaulted(&self) -> bool {
    matches!(self.binding, Binding::Defaulted { .. })
  }
}

/// Bindings for every target field, in target declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPlan {
  origin: Identity,
  target: Identity,
  bindings: Vec<TargetFieldBinding>,
}

impl MappingPlan {
  pub fn origin(&self) -> &Identity {
    &self.origin
  }

  pub fn target(&self) -> &Identity {
    &self.target
  }

  pub fn bindings(&self) -> &[TargetFieldBinding] {
    &self.bindings
  }

  pub fn explicit(&self) -> impl Iterator<Item = &TargetFieldBinding> {
    self.bindings.iter().filter(|b| !b.is_defaulted())
  }

  pub fn defaulted(&self) -> impl Iterator<Item = &TargetFieldBinding> {
    self.bindings.iter().filter(|b| b.is_defaulted())
  }
}

/// Match every target field against the origin by exact name and type.
///
/// The first matching origin field in declaration order wins. An unresolved
/// target yields no bindings, an unresolved origin makes every binding
/// explicit.
pub fn plan(origin: &RecordSchema, target: &RecordSchema) -> MappingPlan {
  let origin_fields = origin.fields().unwrap_or(&[]);
  let bindings = target
    .fields()
    .unwrap_or(&[])
    .iter()
    .map(|field| {
      let binding = origin_fields
        .iter()
        .find(|o| o.matches(field))
        .map(|o| Binding::Defaulted {
          origin_field: o.name().to_string(),
        })
        .unwrap_or(Binding::Explicit);
      TargetFieldBinding {
        field: field.clone(),
        binding,
      }
    })
    .collect();

  MappingPlan {
    origin: origin.identity().clone(),
    target: target.identity().clone(),
    bindings,
  }
}
