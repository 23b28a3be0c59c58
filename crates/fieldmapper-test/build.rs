fn main() {
  if let Err(err) = fieldmapper_build::Builder::new()
    .source("src/models.rs", "crate::models")
    .generate()
  {
    panic!("{}", err);
  }
}
