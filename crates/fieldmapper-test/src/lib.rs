//! Fixtures for both ways of generating mappers: `mappers!` in [`inline`],
//! and the build script over [`models`].

pub mod inline;
pub mod models;

include!(concat!(env!("OUT_DIR"), "/mappers.rs"));
