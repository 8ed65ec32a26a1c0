//! `ogrkit-core` is the core library for the `ogrkit` project: a typed command
//! builder for GDAL's `ogr2ogr` vector translation tool.
//!
//! This crate includes:
//! - **Format Registry**: the output formats `ogr2ogr` is driven with, how they are
//!   inferred from a destination, and the default options each one implies.
//! - **Option Layers**: builder-derived defaults merged under user overrides.
//! - **Command Builder**: [`ogr2ogr::Ogr2ogr`], which assembles the argument list in
//!   the order `ogr2ogr` expects and hands it to a process runner.
//! - **Execution**: a [`runner::SystemRunner`] that launches the tool with `std::process`.

pub mod config;
pub mod error;
pub mod formats;
pub mod ogr2ogr;
pub mod options;
pub mod runner;

pub use ogrkit_core_common::{CommandLine, DataSource, PgConnection, ProcessOutput, ProcessRunner};
