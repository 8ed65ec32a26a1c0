//! Command builder for `ogr2ogr`.
//!
//! [`Ogr2ogr`] collects an input, an output, option sets and write modes, and
//! turns them into the argument list `ogr2ogr` expects. The order of the
//! arguments matters to the tool's parser and is fixed:
//!
//! 1. executable
//! 2. `-update` (data-source mode)
//! 3. `-append` / `-overwrite` (layer mode)
//! 4. `-t_srs`
//! 5. `-a_srs` and `-s_srs`, both with the input SRS
//! 6. `-f`
//! 7. `-dsco KEY=VALUE`...
//! 8. `-lco KEY=VALUE`...
//! 9. `--config KEY VALUE`...
//! 10. `-nln`
//! 11. `-nlt`
//! 12. output, input, and the input table if one was named
//!
//! The builder performs no validation. Bad SRS codes, unknown option names and
//! missing data sources are reported by `ogr2ogr` itself when it runs.
//!
//! # Examples
//!
//! ```
//! use ogrkit_core::ogr2ogr::{DataSourceMode, LayerMode, Ogr2ogr};
//! use ogrkit_core::options::option_map;
//!
//! let mut ogr = Ogr2ogr::new();
//! ogr.set_input("/data/roads.shp", None, Some("EPSG:25830"), Some("LATIN1"))
//!     .set_output("/tmp/roads.sqlite", None, None, Some("EPSG:4326"))
//!     .set_output_mode(LayerMode::Overwrite, DataSourceMode::Create);
//! ogr.set_layer_creation_options(option_map([("SPATIAL_INDEX", "YES")]));
//!
//! let cmd = ogr.command_line();
//! assert_eq!(
//!     cmd.to_string(),
//!     "/usr/bin/ogr2ogr -overwrite -t_srs EPSG:4326 -a_srs EPSG:25830 -s_srs EPSG:25830 \
//!      -f SQLite -dsco SPATIALITE=YES -lco SPATIAL_INDEX=YES \
//!      --config SHAPE_ENCODING LATIN1 -nln roads.shp /tmp/roads.sqlite /data/roads.shp"
//! );
//! ```

use std::path::Path;

use log::debug;
use ogrkit_core_common::{CommandLine, DataSource, ProcessRunner};

use crate::config::ToolConfig;
use crate::formats::OutputFormat;
use crate::options::{OptionLayer, OptionMap};

/// Config option carrying the character encoding of shapefile input.
pub const SHAPE_ENCODING: &str = "SHAPE_ENCODING";

const FLAG_UPDATE: &str = "-update";
const FLAG_APPEND: &str = "-append";
const FLAG_OVERWRITE: &str = "-overwrite";
const FLAG_TARGET_SRS: &str = "-t_srs";
const FLAG_ASSIGN_SRS: &str = "-a_srs";
const FLAG_SOURCE_SRS: &str = "-s_srs";
const FLAG_FORMAT: &str = "-f";
const FLAG_DATASET_OPTION: &str = "-dsco";
const FLAG_LAYER_OPTION: &str = "-lco";
const FLAG_CONFIG: &str = "--config";
const FLAG_LAYER_NAME: &str = "-nln";
const FLAG_GEOMETRY_TYPE: &str = "-nlt";

/// What happens to the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerMode {
    /// Create the layer; fails if it already exists.
    #[default]
    Create,
    /// Append features to an existing layer.
    Append,
    /// Drop and recreate an existing layer.
    Overwrite,
}

/// What happens to the output data source (file or database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSourceMode {
    /// Create a new data source.
    #[default]
    Create,
    /// Open an existing data source for update.
    Update,
    /// Update the data source if it exists, create it otherwise.
    ///
    /// This currently always emits `-update`, whether or not the destination exists.
    CreateOrUpdate,
}

/// The data source being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Where features are read from.
    pub source: DataSource,
    /// Layer to read from a multi-layer source.
    pub table_name: Option<String>,
    /// SRS assigned to the input and used as the reprojection source.
    pub srs: Option<String>,
    /// Character encoding, forwarded as `SHAPE_ENCODING`.
    pub encoding: Option<String>,
}

/// The data source being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Where features are written.
    pub destination: DataSource,
    /// Resolved driver, explicit or inferred from `destination`.
    pub format: OutputFormat,
    /// Name of the layer to write.
    pub table_name: Option<String>,
    /// SRS to reproject to.
    pub srs: Option<String>,
}

/// Builder for a single `ogr2ogr` invocation.
///
/// Configure it once with [`set_input`](Self::set_input) and
/// [`set_output`](Self::set_output), adjust modes and options, then call
/// [`execute`](Self::execute). Defaults derived by the setters (the shapefile
/// encoding, format-specific creation options) accumulate; calling the setters
/// again before executing keeps earlier defaults around.
#[derive(Debug, Clone, Default)]
pub struct Ogr2ogr {
    config: ToolConfig,
    input: Option<Input>,
    output: Option<Output>,
    layer_mode: LayerMode,
    data_source_mode: DataSourceMode,
    dataset_creation_options: OptionLayer,
    layer_creation_options: OptionLayer,
    config_options: OptionLayer,
    geometry_type: Option<String>,
}

impl Ogr2ogr {
    /// Creates a builder that runs `/usr/bin/ogr2ogr`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder using the executable from `config`.
    #[must_use]
    pub fn with_config(config: ToolConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the data source to read.
    ///
    /// `source` may be a path (wrapped as a file reference) or any other
    /// [`DataSource`]. `table_name` selects a layer inside multi-layer sources.
    /// `srs` is an identifier such as `"EPSG:4326"`; it is both assigned to the
    /// input and used as the source of the reprojection. `encoding` becomes the
    /// default `SHAPE_ENCODING` config option. Empty strings count as unset.
    pub fn set_input(
        &mut self,
        source: impl Into<DataSource>,
        table_name: Option<&str>,
        srs: Option<&str>,
        encoding: Option<&str>,
    ) -> &mut Self {
        let encoding = non_empty(encoding);
        if let Some(encoding) = encoding {
            self.config_options.set_default(SHAPE_ENCODING, encoding);
        }
        self.input = Some(Input {
            source: source.into(),
            table_name: non_empty(table_name).map(str::to_string),
            srs: non_empty(srs).map(str::to_string),
            encoding: encoding.map(str::to_string),
        });
        self
    }

    /// Sets the data source to write.
    ///
    /// When `file_type` is `None` the format is inferred from the destination
    /// (see [`OutputFormat::infer`]). The format's default creation options are
    /// recorded underneath any user-supplied ones. `table_name` names the
    /// output layer and `srs` is the reprojection target. Empty strings count
    /// as unset.
    pub fn set_output(
        &mut self,
        destination: impl Into<DataSource>,
        file_type: Option<OutputFormat>,
        table_name: Option<&str>,
        srs: Option<&str>,
    ) -> &mut Self {
        let destination = destination.into();
        let format = file_type
            .unwrap_or_else(|| OutputFormat::infer(&destination.encode().to_string_lossy()));

        let defaults = format.defaults();
        for (key, value) in defaults.dataset_creation {
            self.dataset_creation_options.set_default(*key, *value);
        }
        for (key, value) in defaults.layer_creation {
            self.layer_creation_options.set_default(*key, *value);
        }

        debug!("Output {destination} resolved to format {format}");
        self.output = Some(Output {
            destination,
            format,
            table_name: non_empty(table_name).map(str::to_string),
            srs: non_empty(srs).map(str::to_string),
        });
        self
    }

    /// Sets how the output layer and data source are opened.
    pub fn set_output_mode(
        &mut self,
        layer_mode: LayerMode,
        data_source_mode: DataSourceMode,
    ) -> &mut Self {
        self.layer_mode = layer_mode;
        self.data_source_mode = data_source_mode;
        self
    }

    /// Overrides the output geometry type (`-nlt`). `None` restores the
    /// format default.
    pub fn set_geometry_type(&mut self, geometry_type: Option<&str>) -> &mut Self {
        self.geometry_type = geometry_type.map(str::to_string);
        self
    }

    /// Replaces the user dataset-creation options (`-dsco`).
    pub fn set_dataset_creation_options(&mut self, options: OptionMap) -> &mut Self {
        self.dataset_creation_options.set_overrides(options);
        self
    }

    /// Replaces the user layer-creation options (`-lco`).
    pub fn set_layer_creation_options(&mut self, options: OptionMap) -> &mut Self {
        self.layer_creation_options.set_overrides(options);
        self
    }

    /// Replaces the user config options (`--config`).
    pub fn set_config_options(&mut self, options: OptionMap) -> &mut Self {
        self.config_options.set_overrides(options);
        self
    }

    /// Effective dataset-creation options, e.g. `{"SPATIALITE": "YES"}`.
    #[must_use]
    pub fn dataset_creation_options(&self) -> OptionMap {
        self.dataset_creation_options.merged()
    }

    /// Effective layer-creation options, e.g. `{"SPATIAL_INDEX": "YES"}`.
    #[must_use]
    pub fn layer_creation_options(&self) -> OptionMap {
        self.layer_creation_options.merged()
    }

    /// Effective config options, e.g. `{"SHAPE_ENCODING": "LATIN1"}`.
    #[must_use]
    pub fn config_options(&self) -> OptionMap {
        self.config_options.merged()
    }

    /// The geometry type passed to `-nlt`, if any.
    ///
    /// An explicit, non-empty override wins; otherwise the output format's
    /// default applies (`PROMOTE_TO_MULTI` for PostgreSQL).
    #[must_use]
    pub fn geometry_type(&self) -> Option<&str> {
        match self.geometry_type.as_deref() {
            Some(explicit) if !explicit.is_empty() => Some(explicit),
            _ => self
                .output
                .as_ref()
                .and_then(|output| output.format.defaults().geometry_type),
        }
    }

    /// The configured input, if any.
    #[must_use]
    pub fn input(&self) -> Option<&Input> {
        self.input.as_ref()
    }

    /// The configured output, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    /// The resolved output format, once an output is set.
    #[must_use]
    pub fn output_format(&self) -> Option<&OutputFormat> {
        self.output.as_ref().map(|output| &output.format)
    }

    /// How the output layer is opened.
    #[must_use]
    pub fn layer_mode(&self) -> LayerMode {
        self.layer_mode
    }

    /// How the output data source is opened.
    #[must_use]
    pub fn data_source_mode(&self) -> DataSourceMode {
        self.data_source_mode
    }

    /// The `ogr2ogr` executable this builder runs.
    #[must_use]
    pub fn command_path(&self) -> &Path {
        self.config.command_path()
    }

    /// Assembles the full argument list.
    #[must_use]
    pub fn command_line(&self) -> CommandLine {
        let mut cmd = CommandLine::new(self.config.command_path());
        let input = self.input.as_ref();
        let output = self.output.as_ref();

        match self.data_source_mode {
            DataSourceMode::Create => {},
            DataSourceMode::Update => {
                cmd.push(FLAG_UPDATE);
            },
            DataSourceMode::CreateOrUpdate => {
                // Existing and missing destinations are both opened with -update.
                let exists = output
                    .and_then(|o| o.destination.as_path())
                    .is_some_and(Path::exists);
                debug!("CreateOrUpdate on destination (exists: {exists})");
                cmd.push(FLAG_UPDATE);
            },
        }

        match self.layer_mode {
            LayerMode::Create => {},
            LayerMode::Append => {
                cmd.push(FLAG_APPEND);
            },
            LayerMode::Overwrite => {
                cmd.push(FLAG_OVERWRITE);
            },
        }

        if let Some(srs) = output.and_then(|o| o.srs.as_deref()) {
            cmd.push(FLAG_TARGET_SRS).push(srs);
        }

        if let Some(srs) = input.and_then(|i| i.srs.as_deref()) {
            cmd.push(FLAG_ASSIGN_SRS).push(srs);
            cmd.push(FLAG_SOURCE_SRS).push(srs);
        }

        let format = output.map_or_else(|| OutputFormat::EsriShapefile, |o| o.format.clone());
        cmd.push(FLAG_FORMAT).push(format.name());

        for (key, value) in self.dataset_creation_options() {
            cmd.push(FLAG_DATASET_OPTION).push(format!("{key}={value}"));
        }
        for (key, value) in self.layer_creation_options() {
            cmd.push(FLAG_LAYER_OPTION).push(format!("{key}={value}"));
        }
        for (key, value) in self.config_options() {
            cmd.push(FLAG_CONFIG).push(key).push(value);
        }

        self.push_layer_name(&mut cmd);

        if let Some(geometry_type) = self.geometry_type() {
            cmd.push(FLAG_GEOMETRY_TYPE).push(geometry_type);
        }

        if let Some(output) = output {
            cmd.push_split(output.destination.encode(), output.destination.to_string());
        }
        if let Some(input) = input {
            cmd.push_split(input.source.encode(), input.source.to_string());
            if let Some(table) = &input.table_name {
                cmd.push(table.as_str());
            }
        }

        cmd
    }

    /// Output layer name: the output table, else the input table, else the
    /// input file's base name (extension kept).
    fn push_layer_name(&self, cmd: &mut CommandLine) {
        let output_table = self.output.as_ref().and_then(|o| o.table_name.as_deref());
        let input_table = self.input.as_ref().and_then(|i| i.table_name.as_deref());

        if let Some(name) = output_table.or(input_table) {
            cmd.push(FLAG_LAYER_NAME).push(name);
        } else if let Some(file_name) = self
            .input
            .as_ref()
            .and_then(|i| i.source.as_path())
            .and_then(Path::file_name)
        {
            cmd.push(FLAG_LAYER_NAME)
                .push_split(file_name, file_name.to_string_lossy().into_owned());
        }
    }

    /// Assembles the command and hands it to `runner`.
    ///
    /// Returns whatever the runner returns; the builder adds no error handling
    /// of its own.
    pub fn execute<R: ProcessRunner>(&self, runner: &R) -> R::Output {
        let cmd = self.command_line();
        debug!("{cmd}");
        runner.run(&cmd)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::ffi::OsString;

    use ogrkit_core_common::PgConnection;
    use tempfile::TempDir;

    use super::*;
    use crate::formats::PROMOTE_TO_MULTI;
    use crate::options::option_map;

    fn tokens(ogr: &Ogr2ogr) -> Vec<String> {
        ogr.command_line().display_args().to_vec()
    }

    fn count(tokens: &[String], flag: &str) -> usize {
        tokens.iter().filter(|t| *t == flag).count()
    }

    fn value_after(tokens: &[String], flag: &str) -> Option<String> {
        tokens
            .iter()
            .position(|t| t == flag)
            .and_then(|i| tokens.get(i + 1).cloned())
    }

    #[test]
    fn test_minimal_command() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, None)
            .set_output("out.json", None, None, None);
        assert_eq!(
            tokens(&ogr),
            [
                "/usr/bin/ogr2ogr",
                "-f",
                "GeoJSON",
                "-nln",
                "in.shp",
                "out.json",
                "in.shp"
            ]
        );
    }

    #[test]
    fn test_full_argument_order() {
        let mut ogr = Ogr2ogr::with_config(ToolConfig::with_command_path("ogr2ogr"));
        ogr.set_input("/data/in.sqlite", Some("parcels"), Some("EPSG:25830"), Some("UTF-8"))
            .set_output("/data/out.sqlite", None, Some("lots"), Some("EPSG:4326"))
            .set_output_mode(LayerMode::Append, DataSourceMode::Update)
            .set_geometry_type(Some("MULTIPOLYGON"))
            .set_layer_creation_options(option_map([("SPATIAL_INDEX", "YES")]))
            .set_config_options(option_map([("OGR_ENABLE_PARTIAL_REPROJECTION", "YES")]));

        assert_eq!(
            tokens(&ogr),
            [
                "ogr2ogr",
                "-update",
                "-append",
                "-t_srs",
                "EPSG:4326",
                "-a_srs",
                "EPSG:25830",
                "-s_srs",
                "EPSG:25830",
                "-f",
                "SQLite",
                "-dsco",
                "SPATIALITE=YES",
                "-lco",
                "SPATIAL_INDEX=YES",
                "--config",
                "OGR_ENABLE_PARTIAL_REPROJECTION",
                "YES",
                "--config",
                "SHAPE_ENCODING",
                "UTF-8",
                "-nln",
                "lots",
                "-nlt",
                "MULTIPOLYGON",
                "/data/out.sqlite",
                "/data/in.sqlite",
                "parcels",
            ]
        );
    }

    #[test]
    fn test_explicit_format_wins_over_inference() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output("out.json", Some(OutputFormat::Gml), None, None);
        assert_eq!(ogr.output_format(), Some(&OutputFormat::Gml));
        assert_eq!(value_after(&tokens(&ogr), "-f").as_deref(), Some("GML"));

        ogr.set_output("out.json", Some(OutputFormat::from_name("GPKG")), None, None);
        assert_eq!(value_after(&tokens(&ogr), "-f").as_deref(), Some("GPKG"));
    }

    #[test]
    fn test_unknown_destination_defaults_to_shapefile() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output("/tmp/output_dir", None, None, None);
        assert_eq!(ogr.output_format(), Some(&OutputFormat::EsriShapefile));
    }

    #[test]
    fn test_sqlite_output_enables_spatialite() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output("db.SQLITE", None, None, None);
        assert_eq!(ogr.dataset_creation_options()["SPATIALITE"], "YES");

        // explicit SQLite gets the same default
        let mut explicit = Ogr2ogr::new();
        explicit.set_output("db.bin", Some(OutputFormat::Sqlite), None, None);
        assert_eq!(explicit.dataset_creation_options()["SPATIALITE"], "YES");
    }

    #[test]
    fn test_user_options_override_defaults() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, Some("LATIN1"))
            .set_output("db.sqlite", None, None, None)
            .set_dataset_creation_options(option_map([("SPATIALITE", "NO"), ("METADATA", "YES")]))
            .set_config_options(option_map([(SHAPE_ENCODING, "UTF-8")]));

        let dsco = ogr.dataset_creation_options();
        assert_eq!(dsco["SPATIALITE"], "NO");
        assert_eq!(dsco["METADATA"], "YES");
        assert_eq!(ogr.config_options()[SHAPE_ENCODING], "UTF-8");

        let args = tokens(&ogr);
        assert!(args.contains(&"SPATIALITE=NO".to_string()));
        assert!(!args.contains(&"SPATIALITE=YES".to_string()));
        assert_eq!(count(&args, "--config"), 1);
    }

    #[test]
    fn test_replacing_user_options_keeps_defaults() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, Some("LATIN1"));
        ogr.set_config_options(option_map([("A", "1")]));
        ogr.set_config_options(OptionMap::new());
        assert_eq!(ogr.config_options(), option_map([(SHAPE_ENCODING, "LATIN1")]));
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("/data/roads.shp", Some(""), Some(""), Some(""))
            .set_output("out.shp", None, Some(""), Some(""));
        assert_eq!(
            tokens(&ogr),
            [
                "/usr/bin/ogr2ogr",
                "-f",
                "ESRI Shapefile",
                "-nln",
                "roads.shp",
                "out.shp",
                "/data/roads.shp"
            ]
        );
        assert!(ogr.config_options().is_empty());
        assert_eq!(ogr.input().unwrap().table_name, None);
        assert_eq!(ogr.output().unwrap().srs, None);
    }

    #[test]
    fn test_encoding_becomes_config_default() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, Some("ISO-8859-15"))
            .set_output("out.shp", None, None, None);
        let args = tokens(&ogr);
        let i = args.iter().position(|t| t == "--config").unwrap();
        assert_eq!(args[i + 1], "SHAPE_ENCODING");
        assert_eq!(args[i + 2], "ISO-8859-15");
        assert_eq!(ogr.input().unwrap().encoding.as_deref(), Some("ISO-8859-15"));
    }

    #[test]
    fn test_postgres_output_promotes_to_multi() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output(
            PgConnection::new().with_dbname("gis").with_password("pw"),
            None,
            None,
            None,
        );
        assert_eq!(ogr.output_format(), Some(&OutputFormat::PostgreSql));
        assert_eq!(ogr.geometry_type(), Some(PROMOTE_TO_MULTI));
        assert_eq!(
            value_after(&tokens(&ogr), "-nlt").as_deref(),
            Some(PROMOTE_TO_MULTI)
        );

        ogr.set_geometry_type(Some("POINT"));
        assert_eq!(ogr.geometry_type(), Some("POINT"));

        ogr.set_geometry_type(Some(""));
        assert_eq!(ogr.geometry_type(), Some(PROMOTE_TO_MULTI));
    }

    #[test]
    fn test_geometry_type_unset_for_files() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, None)
            .set_output("out.gpx", None, None, None);
        assert_eq!(ogr.geometry_type(), None);
        assert_eq!(count(&tokens(&ogr), "-nlt"), 0);

        ogr.set_geometry_type(Some("LINESTRING"));
        assert_eq!(value_after(&tokens(&ogr), "-nlt").as_deref(), Some("LINESTRING"));
    }

    #[test]
    fn test_layer_name_from_input_table() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("PG:dbname=src", Some("parcels"), None, None)
            .set_output("out.shp", None, None, None);
        let args = tokens(&ogr);
        assert_eq!(value_after(&args, "-nln").as_deref(), Some("parcels"));
        assert_eq!(&args[args.len() - 3..], ["out.shp", "PG:dbname=src", "parcels"]);
    }

    #[test]
    fn test_layer_name_prefers_output_table() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.sqlite", Some("parcels"), None, None)
            .set_output("out.sqlite", None, Some("lots"), None);
        let args = tokens(&ogr);
        assert_eq!(count(&args, "-nln"), 1);
        assert_eq!(value_after(&args, "-nln").as_deref(), Some("lots"));
    }

    #[test]
    fn test_layer_name_from_input_file_name() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("/data/roads.shp", None, None, None)
            .set_output("out.json", None, None, None);
        let args = tokens(&ogr);
        assert_eq!(value_after(&args, "-nln").as_deref(), Some("roads.shp"));
        // no table, so only two positionals
        assert_eq!(&args[args.len() - 2..], ["out.json", "/data/roads.shp"]);
    }

    #[test]
    fn test_no_layer_name_for_connection_input() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input(
            DataSource::Connection("PG:dbname=src".to_string()),
            None,
            None,
            None,
        )
        .set_output("out.shp", None, None, None);
        assert_eq!(count(&tokens(&ogr), "-nln"), 0);
    }

    #[test]
    fn test_data_source_modes() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, None)
            .set_output("out.shp", None, None, None);
        assert_eq!(count(&tokens(&ogr), "-update"), 0);

        ogr.set_output_mode(LayerMode::Create, DataSourceMode::Update);
        assert_eq!(count(&tokens(&ogr), "-update"), 1);

        ogr.set_output_mode(LayerMode::Create, DataSourceMode::CreateOrUpdate);
        assert_eq!(count(&tokens(&ogr), "-update"), 1);
    }

    #[test]
    fn test_create_or_update_emits_update_whether_or_not_destination_exists() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("existing.shp");
        std::fs::write(&existing, b"").unwrap();
        let missing = dir.path().join("missing.shp");

        for destination in [existing, missing] {
            let mut ogr = Ogr2ogr::new();
            ogr.set_input("in.shp", None, None, None)
                .set_output(destination, None, None, None)
                .set_output_mode(LayerMode::Create, DataSourceMode::CreateOrUpdate);
            let args = tokens(&ogr);
            assert_eq!(count(&args, "-update"), 1);
            assert_eq!(args[1], "-update");
        }
    }

    #[test]
    fn test_layer_modes() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output("out.shp", None, None, None);
        assert_eq!(ogr.layer_mode(), LayerMode::Create);
        assert_eq!(ogr.data_source_mode(), DataSourceMode::Create);
        let args = tokens(&ogr);
        assert_eq!(count(&args, "-append") + count(&args, "-overwrite"), 0);

        ogr.set_output_mode(LayerMode::Append, DataSourceMode::Create);
        assert_eq!(tokens(&ogr)[1], "-append");

        ogr.set_output_mode(LayerMode::Overwrite, DataSourceMode::Update);
        let args = tokens(&ogr);
        assert_eq!(args[1..3], ["-update", "-overwrite"]);
    }

    #[test]
    fn test_source_srs_flags_use_input_srs() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, Some("EPSG:25830"), None)
            .set_output("out.shp", None, None, Some("EPSG:4326"));
        let args = tokens(&ogr);
        assert_eq!(value_after(&args, "-t_srs").as_deref(), Some("EPSG:4326"));
        assert_eq!(value_after(&args, "-a_srs").as_deref(), Some("EPSG:25830"));
        assert_eq!(value_after(&args, "-s_srs").as_deref(), Some("EPSG:25830"));
        let t = args.iter().position(|a| a == "-t_srs").unwrap();
        let a = args.iter().position(|a| a == "-a_srs").unwrap();
        let s = args.iter().position(|a| a == "-s_srs").unwrap();
        assert!(t < a && a < s);
    }

    #[test]
    fn test_srs_values_are_not_validated() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, Some("not-an-srs"), Some("???"))
            .set_output("out.shp", None, None, None);
        let args = tokens(&ogr);
        assert_eq!(value_after(&args, "-a_srs").as_deref(), Some("not-an-srs"));
        assert!(args.contains(&"???".to_string()));
    }

    #[test]
    fn test_options_emitted_sorted_and_tokenised() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_output("out.shp", None, None, None)
            .set_layer_creation_options(option_map([("RESIZE", "YES"), ("ENCODING", "UTF-8")]))
            .set_config_options(option_map([("B_OPT", "2"), ("A_OPT", "1")]));
        let args = tokens(&ogr);
        let lco: Vec<_> = args
            .iter()
            .enumerate()
            .filter(|(_, t)| *t == "-lco")
            .map(|(i, _)| args[i + 1].clone())
            .collect();
        assert_eq!(lco, ["ENCODING=UTF-8", "RESIZE=YES"]);

        let first = args.iter().position(|t| t == "--config").unwrap();
        assert_eq!(args[first..first + 6], ["--config", "A_OPT", "1", "--config", "B_OPT", "2"]);
    }

    #[test]
    fn test_representations_differ_only_in_destinations() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("/data/roads.shp", None, Some("EPSG:4326"), None)
            .set_output(
                PgConnection::new()
                    .with_host("db")
                    .with_dbname("gis")
                    .with_password("hunter2"),
                None,
                Some("roads"),
                None,
            );
        let cmd = ogr.command_line();
        let exec = cmd.args();
        let shown = cmd.display_args();
        assert_eq!(exec.len(), shown.len());

        let out_pos = shown.len() - 2;
        for (i, (e, s)) in exec.iter().zip(shown).enumerate() {
            if i == out_pos {
                assert!(e.to_string_lossy().contains("password='hunter2'"));
                assert!(s.contains("password='xxxxxx'"));
            } else {
                assert_eq!(e, &OsString::from(s));
            }
        }
        assert!(!cmd.to_string().contains("hunter2"));
    }

    struct RecordingRunner {
        seen: RefCell<Vec<CommandLine>>,
    }

    impl ProcessRunner for RecordingRunner {
        type Output = &'static str;

        fn run(&self, command: &CommandLine) -> Self::Output {
            self.seen.borrow_mut().push(command.clone());
            "ran"
        }
    }

    #[test]
    fn test_execute_delegates_to_runner() {
        let mut ogr = Ogr2ogr::new();
        ogr.set_input("in.shp", None, None, None)
            .set_output("out.kml", None, None, None);
        let runner = RecordingRunner {
            seen: RefCell::new(Vec::new()),
        };

        assert_eq!(ogr.execute(&runner), "ran");
        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ogr.command_line());
        assert_eq!(seen[0].program(), ogr.command_path().as_os_str());
    }

    #[test]
    fn test_execute_without_output_still_builds_a_command() {
        let ogr = Ogr2ogr::new();
        let cmd = ogr.command_line();
        assert_eq!(cmd.display_args(), ["/usr/bin/ogr2ogr", "-f", "ESRI Shapefile"]);
    }
}
