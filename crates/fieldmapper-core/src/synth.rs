use crate::error::MappingError;
use crate::plan::{Binding, MappingPlan};
use crate::schema::{Identity, RecordSchema, TypeSig};

const FUNCTION_PREFIX: &str = "mapTo";

/// Generated function name for a target: `mapTo` + capitalized simple name.
pub fn function_name(target: &Identity) -> String {
  let simple = target.simple_name();
  let mut chars = simple.chars();
  let mut name = String::with_capacity(FUNCTION_PREFIX.len() + simple.len());
  name.push_str(FUNCTION_PREFIX);
  if let Some(first) = chars.next() {
    name.extend(first.to_uppercase());
    name.push_str(chars.as_str());
  }
  name
}

/// Value used when the caller omits a defaulted parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefaultValue {
  /// The receiver's field of this name, unchanged.
  OriginField(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
  name: String,
  ty: TypeSig,
  default: Option<DefaultValue>,
}

impl Parameter {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn ty(&self) -> &TypeSig {
    &self.ty
  }

  pub fn default(&self) -> Option<&DefaultValue> {
    self.default.as_ref()
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldInit {
  field: String,
  parameter: String,
}

impl FieldInit {
  pub fn field(&self) -> &str {
    &self.field
  }

  pub fn parameter(&self) -> &str {
    &self.parameter
  }
}

/// `Record { field_0: param_0, .. }` in target field order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Construct {
  record: Identity,
  fields: Vec<FieldInit>,
}

impl Construct {
  pub fn record(&self) -> &Identity {
    &self.record
  }

  pub fn fields(&self) -> &[FieldInit] {
    &self.fields
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedFunction {
  name: String,
  receiver: Identity,
  returns: Identity,
  parameters: Vec<Parameter>,
  body: Construct,
}

impl GeneratedFunction {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn receiver(&self) -> &Identity {
    &self.receiver
  }

  pub fn returns(&self) -> &Identity {
    &self.returns
  }

  /// Required parameters first, then defaulted ones.
  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn parameter(&self, name: &str) -> Option<&Parameter> {
    self.parameters.iter().find(|p| p.name == name)
  }

  pub fn body(&self) -> &Construct {
    &self.body
  }
}

fn malformed(origin: &RecordSchema, schema: &RecordSchema) -> MappingError {
  MappingError::MalformedSchema {
    origin: origin.identity().clone(),
    identity: schema.identity().clone(),
    reason: schema
      .unresolved_reason()
      .unwrap_or("field list unavailable")
      .to_string(),
  }
}

/// Turn a plan into a function descriptor for `target`.
///
/// Fails only when the origin or the target has no field list.
pub fn synthesize(
  origin: &RecordSchema,
  target: &RecordSchema,
  plan: &MappingPlan,
) -> Result<GeneratedFunction, MappingError> {
  if origin.fields().is_none() {
    return Err(malformed(origin, origin));
  }
  let target_fields = target.fields().ok_or_else(|| malformed(origin, target))?;
  debug_assert_eq!(plan.target(), target.identity());
  debug_assert_eq!(plan.bindings().len(), target_fields.len());

  let parameters = plan
    .explicit()
    .chain(plan.defaulted())
    .map(|binding| Parameter {
      name: binding.field().name().to_string(),
      ty: binding.field().ty().clone(),
      default: match binding.binding() {
        Binding::Explicit => None,
        Binding::Defaulted { origin_field } => Some(DefaultValue::OriginField(origin_field.clone())),
      },
    })
    .collect();

  let body = Construct {
    record: target.identity().clone(),
    fields: target_fields
      .iter()
      .map(|field| FieldInit {
        field: field.name().to_string(),
        parameter: field.name().to_string(),
      })
      .collect(),
  };

  let function = GeneratedFunction {
    name: function_name(target.identity()),
    receiver: origin.identity().clone(),
    returns: target.identity().clone(),
    parameters,
    body,
  };
  tracing::debug!(
    "generating mapper function {} which can map a {} to {}",
    function.name,
    function.receiver,
    function.returns
  );
  Ok(function)
}
