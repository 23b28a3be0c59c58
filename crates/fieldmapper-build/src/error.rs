use crate::emit::EmitError;
use fieldmapper_core::{Identity, MappingError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Failed to access `{}`: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse `{}`: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: syn::Error,
  },
  #[error("Invalid mapping attribute in `{}`: {message}", .path.display())]
  Attribute { path: PathBuf, message: String },
  #[error(transparent)]
  Emit(#[from] EmitError),
  #[error("`OUT_DIR` is not set and no output directory was configured")]
  MissingOutDir,
  #[error("Modules for `{first}` and `{second}` would both be written to `{file}`")]
  OutputCollision {
    file: String,
    first: Identity,
    second: Identity,
  },
  #[error("{}", format_diagnostics(.0))]
  Diagnostics(Vec<MappingError>),
}

fn format_diagnostics(diagnostics: &[MappingError]) -> String {
  let lines: Vec<_> = diagnostics.iter().map(|d| format!("  {}", d)).collect();
  format!("{} mapping diagnostic(s):\n{}", diagnostics.len(), lines.join("\n"))
}
