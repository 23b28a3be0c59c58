//! # fieldmapper-core
//!
//! Structural matching between an origin record and its mapping targets.
//!
//! For every target field the [planner](plan::plan) decides whether the value
//! can default to the origin field with the same name and type, or has to be
//! passed explicitly. The [synthesizer](synth::synthesize) turns that plan
//! into a [`GeneratedFunction`] descriptor named `mapTo<Target>`, and the
//! [`ModuleAssembler`] groups the functions of one origin into a
//! [`GeneratedModule`]. [`generate`] runs the whole pass and returns
//! diagnostics as data.
//!
//! Nothing here knows about Rust syntax; extracting schemas and rendering
//! modules is left to `fieldmapper-build`.
//!
//! ```
//! use fieldmapper_core::{generate, FieldSpec, MappingDirective, RecordSchema};
//!
//! let origin = RecordSchema::new("User", vec![
//!   FieldSpec::new("id", "i64"),
//!   FieldSpec::new("name", "String"),
//! ]).unwrap();
//! let target = RecordSchema::new("UserDto", vec![
//!   FieldSpec::new("id", "i64"),
//!   FieldSpec::new("admin", "bool"),
//! ]).unwrap();
//!
//! let output = generate(&[MappingDirective::single(origin, target)]);
//! let func = output.modules[0].function("mapToUserDto").unwrap();
//! let params: Vec<_> = func.parameters().iter().map(|p| (p.name(), p.is_required())).collect();
//! assert_eq!(params, vec![("admin", true), ("id", false)]);
//! ```

pub mod assemble;
pub mod directive;
pub mod error;
pub mod pass;
pub mod plan;
pub mod schema;
pub mod synth;

pub use assemble::{GeneratedModule, ModuleAssembler};
pub use directive::MappingDirective;
pub use error::{MappingError, SchemaError};
pub use pass::{generate, generate_parallel, GenerationOutput};
pub use plan::{plan, Binding, MappingPlan, TargetFieldBinding};
pub use schema::{FieldList, FieldSpec, Identity, RecordSchema, TypeSig};
pub use synth::{function_name, synthesize, Construct, DefaultValue, FieldInit, GeneratedFunction, Parameter};

#[cfg(test)]
pub(crate) mod fixtures {
  use crate::schema::{FieldSpec, Identity, RecordSchema};

  fn origin_fields() -> Vec<FieldSpec> {
    vec![
      FieldSpec::new("id", "i64"),
      FieldSpec::new("name", "String"),
      FieldSpec::new("budget", "i64"),
      FieldSpec::new("remains", "Option < i64 >"),
      FieldSpec::new("loan", "Option < i64 >"),
    ]
  }

  fn schema(namespace: &str, name: &str, fields: Vec<FieldSpec>) -> RecordSchema {
    RecordSchema::new(Identity::from_segments(vec![namespace, name]), fields).unwrap()
  }

  pub fn origin_model(namespace: &str) -> RecordSchema {
    schema(namespace, "OriginModel", origin_fields())
  }

  pub fn destination_model(namespace: &str) -> RecordSchema {
    let mut fields = origin_fields();
    fields.push(FieldSpec::new("rich", "bool"));
    schema(namespace, "DestinationModel", fields)
  }

  pub fn destination_model_2(namespace: &str) -> RecordSchema {
    let mut fields = origin_fields();
    fields.push(FieldSpec::new("rich", "bool"));
    fields.push(FieldSpec::new("happy", "Option < bool >"));
    schema(namespace, "DestinationModel2", fields)
  }

  pub fn destination_model_3(namespace: &str) -> RecordSchema {
    let mut fields = origin_fields();
    fields.push(FieldSpec::new("rich", "bool"));
    fields.push(FieldSpec::new("happy", "Option < bool >"));
    fields.push(FieldSpec::new("retired", "bool"));
    schema(namespace, "DestinationModel3", fields)
  }
}
