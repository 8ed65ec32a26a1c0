//! Common types and traits shared across `ogrkit` crates.
//!
//! This crate provides the collaborator abstractions the command builder in
//! `ogrkit-core` is written against: references to input/output data sources
//! and the process-runner seam that actually launches `ogr2ogr`.

pub mod datasource;
pub mod runner;

// Re-export commonly used types
pub use datasource::{DataSource, PgConnection};
pub use runner::{CommandLine, ProcessOutput, ProcessRunner};
