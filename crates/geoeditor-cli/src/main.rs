//! GeoEditor configuration-authoring CLI.

use clap::{ColorChoice, Parser};
use geoeditor_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};

mod cli;
mod commands;
mod summary;

use crate::cli::{ArtifactsCommand, Cli, Command, LogFormatArg, ProjectsCommand};
use crate::commands::{
    run_artifacts_list, run_artifacts_put, run_artifacts_show, run_export, run_inspect,
    run_profile, run_projects_delete, run_projects_list, run_upgrade,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Profile(args) => run_profile(args),
        Command::Export(args) => run_export(args),
        Command::Upgrade(args) => run_upgrade(args),
        Command::Projects(ProjectsCommand::List(args)) => run_projects_list(args),
        Command::Projects(ProjectsCommand::Delete(args)) => run_projects_delete(args),
        Command::Artifacts(ArtifactsCommand::List(args)) => run_artifacts_list(args),
        Command::Artifacts(ArtifactsCommand::Show(args)) => run_artifacts_show(args),
        Command::Artifacts(ArtifactsCommand::Put(args)) => run_artifacts_put(args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
