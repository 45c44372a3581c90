//! CLI argument definitions for the GeoEditor configuration tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "geoeditor",
    version,
    about = "GeoEditor - author weighted dataset configurations from feature collections",
    long_about = "Ingest feature collections (JSON or CSV), inspect inferred field types,\n\
                  profile qualitative attributes, assign weights, and export versioned\n\
                  configuration records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a feature collection and list its fields with inferred types.
    Inspect(InspectArgs),

    /// Show the attribute frequency profile of one qualitative field.
    Profile(ProfileArgs),

    /// Build a dataset configuration and write the versioned record.
    Export(ExportArgs),

    /// Re-stamp an older configuration record to the current schema.
    Upgrade(UpgradeArgs),

    /// Work with the persisted project store.
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Manage named JSON artifacts in a directory.
    #[command(subcommand)]
    Artifacts(ArtifactsCommand),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Feature collection: .json/.geojson or .csv.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Feature collection: .json/.geojson or .csv.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Field to profile; must classify as qualitative.
    #[arg(value_name = "FIELD")]
    pub field: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Feature collection: .json/.geojson or .csv.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Project name for the exported configuration.
    #[arg(long)]
    pub name: String,

    /// Optional project description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Fields to select, comma separated. Defaults to every field.
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Per-field fraction weights as field=value pairs.
    #[arg(long = "weight", value_name = "FIELD=FRACTION")]
    pub weights: Vec<String>,

    /// Reset the selection to equal weights before applying --weight.
    #[arg(long)]
    pub equal: bool,

    /// Where to write the configuration record.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Directory holding the project slot; the dataset is stored there too.
    #[arg(long, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct UpgradeArgs {
    /// Existing configuration record (v1.0 or v2.0).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the upgraded record; defaults to in-place.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ProjectsCommand {
    /// List every project in the store.
    List(ProjectsDirArgs),

    /// Delete a project by id; fails while other projects reference it.
    Delete(ProjectsDeleteArgs),
}

#[derive(Parser)]
pub struct ProjectsDirArgs {
    /// Directory holding the `geoeditor_projects` slot.
    #[arg(long, value_name = "DIR")]
    pub store_dir: PathBuf,
}

#[derive(Parser)]
pub struct ProjectsDeleteArgs {
    /// Directory holding the `geoeditor_projects` slot.
    #[arg(long, value_name = "DIR")]
    pub store_dir: PathBuf,

    /// Project id to delete.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Subcommand)]
pub enum ArtifactsCommand {
    /// List artifact names in the directory.
    List(ArtifactsDirArgs),

    /// Print one artifact as pretty JSON.
    Show(ArtifactShowArgs),

    /// Store a JSON document under an artifact name.
    Put(ArtifactPutArgs),
}

#[derive(Parser)]
pub struct ArtifactsDirArgs {
    /// Directory holding `.json` artifacts.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,
}

#[derive(Parser)]
pub struct ArtifactShowArgs {
    /// Directory holding `.json` artifacts.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Artifact name, without extension.
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Parser)]
pub struct ArtifactPutArgs {
    /// Directory holding `.json` artifacts.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Artifact name, without extension.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// JSON document to store.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
