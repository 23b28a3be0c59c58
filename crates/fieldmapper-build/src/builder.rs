use crate::emit;
use crate::error::Error;
use crate::extract::Extractor;
use convert_case::{Case, Casing};
use fieldmapper_core::{GenerationOutput, Identity, MappingError};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INDEX_NAME: &str = "mappers.rs";

#[derive(Debug, Clone)]
struct SourceSpec {
  path: PathBuf,
  module: String,
}

/// Generates mapping functions from a build script.
///
/// ```no_run
/// fieldmapper_build::Builder::new()
///   .source("src/models.rs", "crate::models")
///   .generate()
///   .unwrap();
/// ```
///
/// and in the crate:
///
/// ```ignore
/// include!(concat!(env!("OUT_DIR"), "/mappers.rs"));
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
  sources: Vec<SourceSpec>,
  out_dir: Option<PathBuf>,
  index_name: String,
  cargo_directives: bool,
  deny_diagnostics: bool,
}

impl Default for Builder {
  fn default() -> Self {
    Self {
      sources: vec![],
      out_dir: None,
      index_name: DEFAULT_INDEX_NAME.to_string(),
      cargo_directives: true,
      deny_diagnostics: true,
    }
  }
}

#[derive(Debug)]
pub struct Report {
  /// One file per generated module.
  pub files: Vec<PathBuf>,
  pub index: PathBuf,
  pub diagnostics: Vec<MappingError>,
}

impl Builder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Scan `path`, compiled as module `module` (e.g. `crate::models`).
  ///
  /// Relative paths resolve against `CARGO_MANIFEST_DIR` when it is set.
  pub fn source<P: Into<PathBuf>, M: Into<String>>(mut self, path: P, module: M) -> Self {
    self.sources.push(SourceSpec {
      path: path.into(),
      module: module.into(),
    });
    self
  }

  /// Output directory, `OUT_DIR` by default.
  pub fn out_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
    self.out_dir = Some(path.into());
    self
  }

  pub fn index_name<S: Into<String>>(mut self, name: S) -> Self {
    self.index_name = name.into();
    self
  }

  /// Print `cargo:rerun-if-changed` and `cargo:warning` lines.
  pub fn cargo_directives(mut self, enabled: bool) -> Self {
    self.cargo_directives = enabled;
    self
  }

  /// Fail before writing anything if the pass reports diagnostics.
  pub fn deny_diagnostics(mut self, enabled: bool) -> Self {
    self.deny_diagnostics = enabled;
    self
  }

  fn resolve_out_dir(&self) -> Result<PathBuf, Error> {
    match self.out_dir {
      Some(ref dir) => Ok(dir.clone()),
      None => env::var_os("OUT_DIR").map(PathBuf::from).ok_or(Error::MissingOutDir),
    }
  }

  fn resolve_source(path: &Path) -> PathBuf {
    match env::var_os("CARGO_MANIFEST_DIR") {
      Some(dir) if path.is_relative() => PathBuf::from(dir).join(path),
      _ => path.to_path_buf(),
    }
  }

  fn run_pass(&self) -> Result<GenerationOutput, Error> {
    let mut directives = vec![];
    for source in &self.sources {
      let path = Self::resolve_source(&source.path);
      if self.cargo_directives {
        println!("cargo:rerun-if-changed={}", path.display());
      }
      let content = fs::read_to_string(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
      })?;
      let file = syn::parse_file(&content).map_err(|source| Error::Parse {
        path: path.clone(),
        source,
      })?;
      let extraction = Extractor::new(&source.module).extract_file(&file);
      if let Some(err) = extraction.errors.first() {
        return Err(Error::Attribute {
          path,
          message: err.to_string(),
        });
      }
      directives.extend(extraction.directives);
    }
    Ok(fieldmapper_core::generate(&directives))
  }

  pub fn generate(&self) -> Result<Report, Error> {
    let out_dir = self.resolve_out_dir()?;
    let output = self.run_pass()?;

    for diagnostic in &output.diagnostics {
      tracing::warn!(origin = %diagnostic.origin(), "{}", diagnostic);
      if self.cargo_directives {
        println!("cargo:warning={}", diagnostic);
      }
    }
    if self.deny_diagnostics && !output.is_clean() {
      return Err(Error::Diagnostics(output.diagnostics));
    }

    let modules: Vec<_> = output.modules.iter().filter(|m| !m.is_empty()).collect();
    let mut owners: BTreeMap<String, &Identity> = BTreeMap::new();
    for module in &modules {
      let file_name = module_file_name(module.origin());
      if let Some(first) = owners.insert(file_name.clone(), module.origin()) {
        return Err(Error::OutputCollision {
          file: file_name,
          first: first.clone(),
          second: module.origin().clone(),
        });
      }
    }

    fs::create_dir_all(&out_dir).map_err(|source| Error::Io {
      path: out_dir.clone(),
      source,
    })?;

    let mut files = vec![];
    let mut index = String::from(emit::HEADER);
    for module in modules {
      let path = out_dir.join(module_file_name(module.origin()));
      write_if_changed(&path, &emit::render(std::slice::from_ref(module))?)?;
      index.push_str(&format!("include!({:?});\n", path.to_string_lossy()));
      files.push(path);
    }

    let index_path = out_dir.join(&self.index_name);
    write_if_changed(&index_path, &index)?;
    tracing::debug!(files = files.len(), index = %index_path.display(), "wrote mapper modules");

    Ok(Report {
      files,
      index: index_path,
      diagnostics: output.diagnostics,
    })
  }
}

/// `crate::models::sub::OriginModel` -> `models_sub_origin_model_mapper.rs`
pub fn module_file_name(origin: &Identity) -> String {
  let stem = origin
    .segments()
    .filter(|s| *s != "crate")
    .map(|s| s.trim_start_matches("r#").to_case(Case::Snake))
    .collect::<Vec<_>>()
    .join("_");
  format!("{}_mapper.rs", stem)
}

fn write_if_changed(path: &Path, content: &str) -> Result<(), Error> {
  if fs::read_to_string(path).map(|existing| existing == content).unwrap_or(false) {
    return Ok(());
  }
  fs::write(path, content).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const MODELS: &str = r#"
    #[fieldmapper::mapper(sub::OriginModel, DestinationModel)]
    pub struct OriginModel {
      pub id: i64,
      pub name: String,
    }

    pub struct DestinationModel {
      pub id: i64,
      pub name: String,
      pub rich: bool,
    }

    pub mod sub {
      #[fieldmapper::mapper(super::DestinationModel, Tuple)]
      pub struct OriginModel {
        pub id: i64,
        pub name: String,
      }

      pub struct Tuple(i64);
    }
  "#;

  fn builder(dir: &tempfile::TempDir, models: &str) -> Builder {
    let source = dir.path().join("models.rs");
    fs::write(&source, models).unwrap();
    Builder::new()
      .source(source, "crate::models")
      .out_dir(dir.path().join("out"))
      .cargo_directives(false)
  }

  #[test]
  fn test_module_file_name() {
    assert_eq!(
      module_file_name(&"crate::models::sub::OriginModel".into()),
      "models_sub_origin_model_mapper.rs"
    );
    assert_eq!(module_file_name(&"OriginModel".into()), "origin_model_mapper.rs");
  }

  #[test]
  fn test_deny_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let err = builder(&dir, MODELS).generate().unwrap_err();
    match err {
      Error::Diagnostics(ref diagnostics) => {
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
          diagnostics[0].target().map(Identity::as_str),
          Some("crate::models::sub::Tuple")
        );
      }
      other => panic!("unexpected error: {}", other),
    }
    assert!(!dir.path().join("out").exists());
  }

  #[test]
  fn test_partial_generation() {
    let dir = tempfile::tempdir().unwrap();
    let report = builder(&dir, MODELS).deny_diagnostics(false).generate().unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.files.len(), 2);
    assert!(report.files[0].ends_with("models_origin_model_mapper.rs"));
    assert!(report.files[1].ends_with("models_sub_origin_model_mapper.rs"));

    let root = fs::read_to_string(&report.files[0]).unwrap();
    assert!(root.contains("impl crate::models::OriginModel"));
    assert!(root.contains("pub fn mapToOriginModel("));
    assert!(root.contains("pub fn mapToDestinationModel("));

    let sub = fs::read_to_string(&report.files[1]).unwrap();
    assert!(sub.contains("impl crate::models::sub::OriginModel"));
    assert!(!sub.contains("mapToTuple"));

    let index = fs::read_to_string(&report.index).unwrap();
    assert!(report.index.ends_with("mappers.rs"));
    assert_eq!(index.matches("include!(").count(), 2);
    syn::parse_file(&index).unwrap();
  }

  #[test]
  fn test_unchanged_files_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let builder = builder(&dir, MODELS).deny_diagnostics(false).index_name("generated.rs");
    let first = builder.generate().unwrap();
    let modified = fs::metadata(&first.files[0]).unwrap().modified().unwrap();
    let second = builder.generate().unwrap();
    assert_eq!(first.files, second.files);
    assert_eq!(fs::metadata(&second.files[0]).unwrap().modified().unwrap(), modified);
    assert!(second.index.ends_with("generated.rs"));
  }

  #[test]
  fn test_duplicate_origin_across_sources() {
    let dir = tempfile::tempdir().unwrap();
    let other = dir.path().join("other.rs");
    fs::write(
      &other,
      "#[mapper(Target)] pub struct OriginModel { pub id: i64 } pub struct Target { pub id: i64 }",
    )
    .unwrap();
    let report = builder(&dir, MODELS)
      .source(other, "crate::models")
      .deny_diagnostics(false)
      .generate()
      .unwrap();
    assert!(report
      .diagnostics
      .iter()
      .any(|d| matches!(d, MappingError::DuplicateOriginModule { .. })));
  }

  #[test]
  fn test_attribute_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = builder(&dir, "#[mapper] pub struct A { pub id: i64 }")
      .generate()
      .unwrap_err();
    assert!(matches!(err, Error::Attribute { .. }));
  }

  #[test]
  fn test_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = builder(&dir, "pub struct {").generate().unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
  }

  #[test]
  fn test_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let err = Builder::new()
      .source(dir.path().join("missing.rs"), "crate")
      .out_dir(dir.path())
      .cargo_directives(false)
      .generate()
      .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[test]
  fn test_output_collision_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let models = r#"
      pub mod a_b {
        #[mapper(super::Target)]
        pub struct C { pub id: i64 }
      }
      pub mod a {
        pub mod b {
          #[mapper(super::super::Target)]
          pub struct C { pub id: i64 }
        }
      }
      pub struct Target { pub id: i64 }
    "#;
    let err = builder(&dir, models).generate().unwrap_err();
    match err {
      Error::OutputCollision { ref file, .. } => assert_eq!(file, "models_a_b_c_mapper.rs"),
      other => panic!("unexpected error: {}", other),
    }
    assert!(!dir.path().join("out").exists());
  }
}
