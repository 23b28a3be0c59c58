use crate::error::MappingError;
use crate::schema::Identity;
use crate::synth::GeneratedFunction;
use std::collections::BTreeSet;

/// All functions generated for one origin, in target declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedModule {
  origin: Identity,
  functions: Vec<GeneratedFunction>,
}

impl GeneratedModule {
  pub fn origin(&self) -> &Identity {
    &self.origin
  }

  pub fn functions(&self) -> &[GeneratedFunction] {
    &self.functions
  }

  pub fn function(&self, name: &str) -> Option<&GeneratedFunction> {
    self.functions.iter().find(|f| f.name() == name)
  }

  pub fn is_empty(&self) -> bool {
    self.functions.is_empty()
  }
}

/// Batches functions into one module per origin for a single pass.
#[derive(Debug, Default)]
pub struct ModuleAssembler {
  origins: BTreeSet<Identity>,
}

impl ModuleAssembler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether a module for `origin` was already assembled in this pass.
  pub fn contains(&self, origin: &Identity) -> bool {
    self.origins.contains(origin)
  }

  pub fn assemble(
    &mut self,
    origin: &Identity,
    functions: Vec<GeneratedFunction>,
  ) -> Result<GeneratedModule, MappingError> {
    if !self.origins.insert(origin.clone()) {
      return Err(MappingError::DuplicateOriginModule {
        origin: origin.clone(),
      });
    }
    debug_assert!(functions.iter().all(|f| f.receiver() == origin));
    Ok(GeneratedModule {
      origin: origin.clone(),
      functions,
    })
  }
}
