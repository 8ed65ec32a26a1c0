//! Output format registry for `ogr2ogr` translations.
//!
//! This module provides a static registry of the output formats the command
//! builder knows about: the driver name passed to `-f`, how the format is
//! recognised from a destination, and the default options the format implies.
//! Supporting another format is a matter of adding a variant and a table row;
//! the command builder never branches on format names.
//!
//! # Examples
//!
//! ```
//! use ogrkit_core::formats::{OutputFormat, find_format};
//!
//! // Infer a format from a destination
//! assert_eq!(OutputFormat::infer("cities.GeoJSON"), OutputFormat::GeoJson);
//! assert_eq!(OutputFormat::infer("PG:dbname=gis"), OutputFormat::PostgreSql);
//!
//! // Unknown destinations fall back to shapefiles
//! assert_eq!(OutputFormat::infer("roads.xyz"), OutputFormat::EsriShapefile);
//!
//! // Look up a registry entry by driver name
//! let sqlite = find_format("sqlite").expect("SQLite should exist");
//! assert_eq!(sqlite.format.name(), "SQLite");
//! ```

use std::fmt;

/// Geometry type that makes `ogr2ogr` promote single geometries to their
/// multi counterparts, so mixed inputs fit a single typed column.
pub const PROMOTE_TO_MULTI: &str = "PROMOTE_TO_MULTI";

/// An `ogr2ogr` output format.
///
/// The known variants carry their inference rules and default options in the
/// [`get_formats`] table. [`OutputFormat::Other`] passes any other driver name
/// through to `-f` untouched and implies no defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// `ESRI Shapefile`, also the fallback for unrecognised destinations.
    EsriShapefile,
    /// `PostgreSQL` / PostGIS.
    PostgreSql,
    /// `SQLite` / Spatialite.
    Sqlite,
    /// `GeoJSON`.
    GeoJson,
    /// `GML`.
    Gml,
    /// `CSV`.
    Csv,
    /// `GPX`.
    Gpx,
    /// `KML`.
    Kml,
    /// Any other driver name, used verbatim.
    ///
    /// Prefer [`OutputFormat::from_name`], which maps known names onto their
    /// variants. An `Other` holding a known name still gets that format's
    /// defaults.
    Other(String),
}

impl OutputFormat {
    /// Returns the driver name passed to `ogr2ogr -f`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::EsriShapefile => "ESRI Shapefile",
            Self::PostgreSql => "PostgreSQL",
            Self::Sqlite => "SQLite",
            Self::GeoJson => "GeoJSON",
            Self::Gml => "GML",
            Self::Csv => "CSV",
            Self::Gpx => "GPX",
            Self::Kml => "KML",
            Self::Other(name) => name,
        }
    }

    /// Resolves a driver name given explicitly by the caller.
    ///
    /// Known names match case-insensitively; anything else is kept as
    /// [`OutputFormat::Other`] and left for `ogr2ogr` to accept or reject.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        find_format(name).map_or_else(
            || Self::Other(name.to_string()),
            |spec| spec.format.clone(),
        )
    }

    /// Infers the output format from a destination's textual form.
    ///
    /// Matching is case-insensitive and follows the registry order; the first
    /// rule that matches wins. Destinations no rule recognises are written as
    /// shapefiles.
    #[must_use]
    pub fn infer(destination: &str) -> Self {
        let lower = destination.to_lowercase();
        get_formats()
            .iter()
            .find(|spec| spec.recognition.matches(&lower))
            .map_or(Self::EsriShapefile, |spec| spec.format.clone())
    }

    /// Returns the registry entry for known formats.
    ///
    /// Lookup goes by driver name, so `Other("sqlite".into())` finds the
    /// SQLite entry just as [`OutputFormat::Sqlite`] does.
    #[must_use]
    pub fn spec(&self) -> Option<&'static FormatSpec> {
        find_format(self.name())
    }

    /// Returns the defaults this format implies; empty for unregistered names.
    #[must_use]
    pub fn defaults(&self) -> &'static FormatDefaults {
        self.spec().map_or(&FormatDefaults::NONE, |spec| &spec.defaults)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for OutputFormat {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// How a format is recognised from a lower-cased destination string.
#[derive(Debug, Clone, Copy)]
pub enum Recognition {
    /// The destination ends with one of these suffixes.
    Suffixes(&'static [&'static str]),
    /// The destination starts with this prefix.
    Prefix(&'static str),
}

impl Recognition {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Self::Suffixes(suffixes) => suffixes.iter().any(|s| lower.ends_with(s)),
            Self::Prefix(prefix) => lower.starts_with(prefix),
        }
    }

    /// Human-readable description for listings (e.g. `.json, .geojson`).
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Suffixes(suffixes) => suffixes.join(", "),
            Self::Prefix(prefix) => format!("{prefix}..."),
        }
    }
}

/// Options a format turns on unless the user says otherwise.
#[derive(Debug, Clone, Copy)]
pub struct FormatDefaults {
    /// Entries placed in the dataset-creation (`-dsco`) defaults.
    pub dataset_creation: &'static [(&'static str, &'static str)],
    /// Entries placed in the layer-creation (`-lco`) defaults.
    pub layer_creation: &'static [(&'static str, &'static str)],
    /// Geometry type used for `-nlt` when none is set explicitly.
    pub geometry_type: Option<&'static str>,
}

impl FormatDefaults {
    /// No defaults at all.
    pub const NONE: Self = Self {
        dataset_creation: &[],
        layer_creation: &[],
        geometry_type: None,
    };

    /// Returns `true` if the format implies nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset_creation.is_empty()
            && self.layer_creation.is_empty()
            && self.geometry_type.is_none()
    }
}

/// Registry entry for a known output format.
#[derive(Debug, Clone)]
pub struct FormatSpec {
    /// The format this entry describes.
    pub format: OutputFormat,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// How destinations in this format are recognised.
    pub recognition: Recognition,
    /// Options the format implies.
    pub defaults: FormatDefaults,
}

impl FormatSpec {
    /// Creates a registry entry.
    #[must_use]
    pub const fn new(
        format: OutputFormat,
        long_name: &'static str,
        recognition: Recognition,
        defaults: FormatDefaults,
    ) -> Self {
        Self {
            format,
            long_name,
            recognition,
            defaults,
        }
    }
}

static FORMATS: [FormatSpec; 8] = [
    FormatSpec::new(
        OutputFormat::EsriShapefile,
        "ESRI Shapefile / DBF",
        Recognition::Suffixes(&[".shp"]),
        FormatDefaults::NONE,
    ),
    FormatSpec::new(
        OutputFormat::PostgreSql,
        "PostgreSQL/PostGIS",
        Recognition::Prefix("pg:"),
        FormatDefaults {
            geometry_type: Some(PROMOTE_TO_MULTI),
            ..FormatDefaults::NONE
        },
    ),
    FormatSpec::new(
        OutputFormat::Sqlite,
        "SQLite / Spatialite",
        Recognition::Suffixes(&[".sqlite"]),
        FormatDefaults {
            dataset_creation: &[("SPATIALITE", "YES")],
            ..FormatDefaults::NONE
        },
    ),
    FormatSpec::new(
        OutputFormat::GeoJson,
        "GeoJSON",
        Recognition::Suffixes(&[".json", ".geojson"]),
        FormatDefaults::NONE,
    ),
    FormatSpec::new(
        OutputFormat::Gml,
        "Geography Markup Language",
        Recognition::Suffixes(&[".gml"]),
        FormatDefaults::NONE,
    ),
    FormatSpec::new(
        OutputFormat::Csv,
        "Comma Separated Value (.csv)",
        Recognition::Suffixes(&[".csv"]),
        FormatDefaults::NONE,
    ),
    FormatSpec::new(
        OutputFormat::Gpx,
        "GPS Exchange Format",
        Recognition::Suffixes(&[".gpx"]),
        FormatDefaults::NONE,
    ),
    FormatSpec::new(
        OutputFormat::Kml,
        "Keyhole Markup Language",
        Recognition::Suffixes(&[".kml"]),
        FormatDefaults::NONE,
    ),
];

/// Returns the complete registry of known output formats, in inference order.
///
/// # Examples
///
/// ```
/// use ogrkit_core::formats::get_formats;
///
/// for spec in get_formats() {
///     println!("{}: {}", spec.format, spec.long_name);
/// }
/// ```
#[must_use]
pub fn get_formats() -> &'static [FormatSpec] {
    &FORMATS
}

/// Finds a format by its driver name (case-insensitive).
///
/// Returns `None` if no known format has the given name.
///
/// # Examples
///
/// ```
/// use ogrkit_core::formats::find_format;
///
/// let spec = find_format("esri shapefile").expect("shapefile should exist");
/// assert_eq!(spec.format.name(), "ESRI Shapefile");
///
/// assert!(find_format("FlatGeobuf").is_none());
/// ```
#[must_use]
pub fn find_format(name: &str) -> Option<&'static FormatSpec> {
    get_formats()
        .iter()
        .find(|spec| spec.format.name().eq_ignore_ascii_case(name))
}

/// Returns all known driver names in alphabetically sorted order.
#[must_use]
pub fn get_format_names() -> Vec<&'static str> {
    let mut names: Vec<_> = get_formats().iter().map(|spec| spec.format.name()).collect();
    names.sort_unstable();
    names
}
