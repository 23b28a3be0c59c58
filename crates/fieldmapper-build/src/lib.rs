//! # fieldmapper-build
//!
//! The Rust side of fieldmapper: reads `#[mapper(..)]` directives out of
//! `syn` syntax trees, runs the [`fieldmapper_core`] pass and renders the
//! resulting modules as Rust. Used by the `mappers!` macro and, through
//! [`Builder`], from build scripts.

pub mod attr;
pub mod builder;
pub mod emit;
pub mod error;
pub mod extract;

pub use builder::{module_file_name, Builder, Report};
pub use emit::EmitError;
pub use error::Error;
pub use extract::{Extraction, Extractor, SpanIndex};
pub use fieldmapper_core;
