//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting the output-format registry in a human-readable form.

use tabled::{Table, Tabled};

use ogrkit_core::formats::{FormatDefaults, FormatSpec};

/// Table row representation for displaying output-format information.
#[derive(Tabled)]
pub struct FormatRow {
    /// Driver name passed to `-f` (e.g., `GeoJSON`).
    #[tabled(rename = "Format")]
    pub name: String,
    /// Full descriptive name of the format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Suffixes or prefix the format is inferred from.
    #[tabled(rename = "Inferred From")]
    pub recognised_by: String,
    /// Options the format turns on by default.
    #[tabled(rename = "Defaults")]
    pub defaults: String,
}

impl From<&FormatSpec> for FormatRow {
    fn from(spec: &FormatSpec) -> Self {
        Self {
            name: spec.format.name().to_string(),
            long_name: spec.long_name.to_string(),
            recognised_by: spec.recognition.describe(),
            defaults: describe_defaults(&spec.defaults),
        }
    }
}

/// Renders a format's defaults as the arguments they turn into.
pub fn describe_defaults(defaults: &FormatDefaults) -> String {
    if defaults.is_empty() {
        return "-".to_string();
    }

    let dsco = defaults
        .dataset_creation
        .iter()
        .map(|(k, v)| format!("-dsco {k}={v}"));
    let lco = defaults
        .layer_creation
        .iter()
        .map(|(k, v)| format!("-lco {k}={v}"));
    let nlt = defaults.geometry_type.map(|g| format!("-nlt {g}"));

    dsco.chain(lco).chain(nlt).collect::<Vec<_>>().join(" ")
}

/// Display the format registry as a table on standard output.
pub fn display_formats(formats: &[FormatSpec]) {
    println!("\nOutput Formats ({} total):\n", formats.len());
    let rows: Vec<FormatRow> = formats.iter().map(FormatRow::from).collect();
    println!("{}", Table::new(rows));
    println!("\nDestinations matching none of the above are written as ESRI Shapefile.");
}
