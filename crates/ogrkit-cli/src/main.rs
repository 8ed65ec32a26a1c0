//! Command-line interface for `ogrkit`, a typed front end to GDAL's `ogr2ogr`.
//!
//! This binary provides a thin CLI over the [`ogrkit_core`] command builder:
//! it parses arguments, configures logging, builds an `ogr2ogr` invocation and
//! either prints it (`--dry-run`) or runs it.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! Records emitted by the library crates through the `log` facade are bridged into
//! `tracing` so both end up in the same subscriber.
//!
//! # Available Commands
//!
//! - `translate` - Build and run an `ogr2ogr` translation
//! - `formats` - List the output formats and the defaults they imply

mod display;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use ogrkit_core::config::{OGR2OGR_PATH_ENV, ToolConfig};
use ogrkit_core::formats::{OutputFormat, get_formats};
use ogrkit_core::ogr2ogr::{DataSourceMode, LayerMode, Ogr2ogr};
use ogrkit_core::options::{OptionMap, parse_option_pair};
use ogrkit_core::runner::SystemRunner;
use ogrkit_core::DataSource;

#[derive(Parser)]
#[command(
    name = "ogrkit",
    version,
    about = "Typed command builder for ogr2ogr",
    long_about = "ogrkit assembles ogr2ogr invocations from structured options:\n\
                  output format inference, default creation options and the\n\
                  argument order ogr2ogr expects."
)]
/// Command-line arguments and options for the `ogrkit` CLI.
///
/// This struct defines the top-level CLI interface, including global flags for
/// logging verbosity and the subcommand to execute.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `ogrkit` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Translates a vector dataset with ogr2ogr.
    Translate(TranslateArgs),

    /// Lists the known output formats, how they are inferred and their defaults.
    Formats,
}

/// Arguments of the `translate` subcommand.
#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input data source: a file path or a `PG:` connection string.
    #[arg(short, long, value_name = "DATASOURCE")]
    input: String,

    /// Output data source: a file path or a `PG:` connection string.
    #[arg(short, long, value_name = "DATASOURCE")]
    output: String,

    /// Output driver name (e.g. "GeoJSON"). Inferred from the output when omitted.
    #[arg(short, long, value_name = "DRIVER")]
    format: Option<String>,

    /// Layer to read from a multi-layer input.
    #[arg(long, value_name = "NAME")]
    input_table: Option<String>,

    /// Name of the layer to write.
    #[arg(long, value_name = "NAME")]
    output_table: Option<String>,

    /// SRS of the input (e.g. "EPSG:25830").
    #[arg(long, value_name = "SRS")]
    s_srs: Option<String>,

    /// SRS to reproject to (e.g. "EPSG:4326").
    #[arg(long, value_name = "SRS")]
    t_srs: Option<String>,

    /// Character encoding of the input (e.g. "LATIN1").
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<String>,

    /// What to do with the output layer.
    #[arg(long, value_enum, default_value_t = LayerModeArg::Create)]
    layer_mode: LayerModeArg,

    /// What to do with the output data source.
    #[arg(long, value_enum, default_value_t = DataSourceModeArg::Create)]
    ds_mode: DataSourceModeArg,

    /// Dataset creation option, repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_option_pair)]
    dsco: Vec<(String, String)>,

    /// Layer creation option, repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_option_pair)]
    lco: Vec<(String, String)>,

    /// GDAL config option, repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_option_pair)]
    config: Vec<(String, String)>,

    /// Output geometry type (e.g. "MULTIPOLYGON").
    #[arg(long, value_name = "TYPE")]
    geometry_type: Option<String>,

    /// Path to the ogr2ogr executable. Defaults to $OGR2OGR_PATH, then /usr/bin/ogr2ogr.
    #[arg(long, value_name = "PATH")]
    ogr2ogr_path: Option<PathBuf>,

    /// Print the command instead of running it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayerModeArg {
    Create,
    Append,
    Overwrite,
}

impl From<LayerModeArg> for LayerMode {
    fn from(arg: LayerModeArg) -> Self {
        match arg {
            LayerModeArg::Create => LayerMode::Create,
            LayerModeArg::Append => LayerMode::Append,
            LayerModeArg::Overwrite => LayerMode::Overwrite,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DataSourceModeArg {
    Create,
    Update,
    CreateOrUpdate,
}

impl From<DataSourceModeArg> for DataSourceMode {
    fn from(arg: DataSourceModeArg) -> Self {
        match arg {
            DataSourceModeArg::Create => DataSourceMode::Create,
            DataSourceModeArg::Update => DataSourceMode::Update,
            DataSourceModeArg::CreateOrUpdate => DataSourceMode::CreateOrUpdate,
        }
    }
}

/// Entry point for the `ogrkit` command-line interface.
///
/// This function parses command-line arguments, configures the logging system based on
/// verbosity flags, and dispatches to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true) // Show module paths for better context
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Translate(args) => {
            handle_translate(&args)?;
        },
        Commands::Formats => {
            handle_formats();
        },
    }

    Ok(())
}

fn collect_options(pairs: &[(String, String)]) -> OptionMap {
    pairs.iter().cloned().collect()
}

/// Turns parsed `translate` arguments into a configured builder.
fn build_command(args: &TranslateArgs) -> Ogr2ogr {
    let config = ToolConfig::resolve(
        args.ogr2ogr_path.clone(),
        std::env::var_os(OGR2OGR_PATH_ENV),
    );

    let mut ogr = Ogr2ogr::with_config(config);
    ogr.set_input(
        DataSource::parse(&args.input),
        args.input_table.as_deref(),
        args.s_srs.as_deref(),
        args.encoding.as_deref(),
    )
    .set_output(
        DataSource::parse(&args.output),
        args.format.as_deref().map(OutputFormat::from_name),
        args.output_table.as_deref(),
        args.t_srs.as_deref(),
    )
    .set_output_mode(args.layer_mode.into(), args.ds_mode.into());

    if args.geometry_type.is_some() {
        ogr.set_geometry_type(args.geometry_type.as_deref());
    }
    if !args.dsco.is_empty() {
        ogr.set_dataset_creation_options(collect_options(&args.dsco));
    }
    if !args.lco.is_empty() {
        ogr.set_layer_creation_options(collect_options(&args.lco));
    }
    if !args.config.is_empty() {
        ogr.set_config_options(collect_options(&args.config));
    }

    debug!(
        "Output format: {}",
        ogr.output_format().map_or("-", OutputFormat::name)
    );
    ogr
}

fn handle_translate(args: &TranslateArgs) -> Result<()> {
    let ogr = build_command(args);
    if let (Some(input), Some(output)) = (ogr.input(), ogr.output()) {
        info!("Translating {} to {}", input.source, output.destination);
    }

    if args.dry_run {
        println!("{}", ogr.command_line());
        return Ok(());
    }

    let output = ogr.execute(&SystemRunner).map_err(|err| {
        if let Some(suggestion) = err.recovery_suggestion() {
            warn!("{suggestion}");
        }
        anyhow!(err.user_message())
    })?;

    if !output.stdout.trim().is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.trim().is_empty() {
        warn!("ogr2ogr reported: {}", output.stderr.trim());
    }
    info!("Translation complete.");
    Ok(())
}

fn handle_formats() {
    display::display_formats(get_formats());
}
