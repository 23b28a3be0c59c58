use crate::assemble::{GeneratedModule, ModuleAssembler};
use crate::directive::MappingDirective;
use crate::error::MappingError;
use crate::plan::plan;
use crate::schema::Identity;
use crate::synth::{synthesize, GeneratedFunction};
use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::BTreeSet;
use std::thread;

/// Result of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
  /// One module per successfully processed origin, in directive order.
  pub modules: Vec<GeneratedModule>,
  pub diagnostics: Vec<MappingError>,
}

impl GenerationOutput {
  pub fn module(&self, origin: &Identity) -> Option<&GeneratedModule> {
    self.modules.iter().find(|m| m.origin() == origin)
  }

  pub fn is_clean(&self) -> bool {
    self.diagnostics.is_empty()
  }
}

enum DirectiveOutcome {
  Rejected(MappingError),
  Synthesized {
    functions: Vec<GeneratedFunction>,
    diagnostics: Vec<MappingError>,
  },
}

fn synthesize_directive(directive: &MappingDirective) -> DirectiveOutcome {
  let origin = directive.origin();
  if origin.fields().is_none() {
    return DirectiveOutcome::Rejected(MappingError::MalformedSchema {
      origin: origin.identity().clone(),
      identity: origin.identity().clone(),
      reason: origin.unresolved_reason().unwrap_or_default().to_string(),
    });
  }

  let mut seen_targets = BTreeSet::new();
  let mut names: BTreeMap<String, Identity> = BTreeMap::new();
  let mut functions = vec![];
  let mut diagnostics = vec![];

  for target in directive.targets() {
    if !seen_targets.insert(target.identity()) {
      diagnostics.push(MappingError::DuplicateTargetInDirective {
        origin: origin.identity().clone(),
        target: target.identity().clone(),
      });
      continue;
    }

    let function = match synthesize(origin, target, &plan(origin, target)) {
      Ok(function) => function,
      Err(err) => {
        diagnostics.push(err);
        continue;
      }
    };

    match names.entry(function.name().to_string()) {
      Entry::Occupied(entry) => {
        diagnostics.push(MappingError::FunctionNameCollision {
          origin: origin.identity().clone(),
          name: function.name().to_string(),
          first: entry.get().clone(),
          target: target.identity().clone(),
        });
      }
      Entry::Vacant(entry) => {
        entry.insert(target.identity().clone());
        functions.push(function);
      }
    }
  }

  DirectiveOutcome::Synthesized {
    functions,
    diagnostics,
  }
}

fn assemble_outcomes<'a, I>(outcomes: I) -> GenerationOutput
where
  I: IntoIterator<Item = (&'a MappingDirective, DirectiveOutcome)>,
{
  let mut assembler = ModuleAssembler::new();
  let mut output = GenerationOutput::default();

  for (directive, outcome) in outcomes {
    let origin = directive.origin().identity();
    if assembler.contains(origin) {
      output.diagnostics.push(MappingError::DuplicateOriginModule {
        origin: origin.clone(),
      });
      continue;
    }

    match outcome {
      DirectiveOutcome::Rejected(err) => output.diagnostics.push(err),
      DirectiveOutcome::Synthesized {
        functions,
        diagnostics,
      } => {
        output.diagnostics.extend(diagnostics);
        match assembler.assemble(origin, functions) {
          Ok(module) => output.modules.push(module),
          Err(err) => output.diagnostics.push(err),
        }
      }
    }
  }

  for diagnostic in &output.diagnostics {
    tracing::debug!(origin = %diagnostic.origin(), "{}", diagnostic);
  }
  output
}

/// Run planning, synthesis and assembly over every directive, in order.
#[tracing::instrument(skip_all, fields(directives = directives.len()))]
pub fn generate(directives: &[MappingDirective]) -> GenerationOutput {
  assemble_outcomes(
    directives
      .iter()
      .map(|directive| (directive, synthesize_directive(directive))),
  )
}

/// Same as [`generate`], with directives synthesized on up to `workers`
/// scoped threads. Assembly still happens in directive order.
#[tracing::instrument(skip_all, fields(directives = directives.len(), workers = workers))]
pub fn generate_parallel(directives: &[MappingDirective], workers: usize) -> GenerationOutput {
  if directives.is_empty() {
    return GenerationOutput::default();
  }
  let workers = workers.max(1).min(directives.len());
  let chunk_size = (directives.len() + workers - 1) / workers;

  let outcomes: Vec<DirectiveOutcome> = thread::scope(|scope| {
    let handles: Vec<_> = directives
      .chunks(chunk_size)
      .map(|chunk| {
        scope.spawn(move || chunk.iter().map(synthesize_directive).collect::<Vec<_>>())
      })
      .collect();
    handles
      .into_iter()
      .flat_map(|handle| match handle.join() {
        Ok(outcomes) => outcomes,
        Err(panic) => std::panic::resume_unwind(panic),
      })
      .collect()
  });

  assemble_outcomes(directives.iter().zip(outcomes))
}
