//! Implementation of a benchmark run.
//!
//! Turns the parsed arguments into a `ProbeConfig`, performs the fatal checks
//! in the order that decides the exit code (mode, directory, probe tool) and
//! hands over to the core orchestrator.

use crate::cli::Cli;
use crate::error::CliResult;

use probediff_core::{CoreError, ExtensionClass, ProbeConfig, ProbeConfigBuilder, RunReport};

use log::{debug, info};

use std::time::Duration;

/// Builds the run configuration from the command line.
pub fn build_config(cli: &Cli) -> CliResult<ProbeConfig> {
    let class: ExtensionClass = cli.mode.parse()?;

    let mut builder = ProbeConfigBuilder::new(class)
        .ffprobe_program(&cli.ffprobe)
        .output_timeout(Duration::from_secs(cli.timeout))
        .exit_timeout(Duration::from_millis(cli.exit_timeout))
        .embedded_timeout(Duration::from_secs(cli.embedded_timeout))
        .jobs(cli.jobs)
        .failure_policy(cli.failure_policy)
        .embedded_backend(cli.embedded);
    if let Some(path) = &cli.extensions {
        builder = builder.extensions_file(path);
    }

    let config = builder.build();
    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Runs the benchmark described by `cli`.
pub fn run_compare(cli: &Cli) -> CliResult<RunReport> {
    let config = build_config(cli)?;

    if !cli.directory.is_dir() {
        return Err(CoreError::DirectoryNotFound(cli.directory.clone()));
    }

    info!("Mode: {} ({})", config.class, config.class.description());
    info!("Directory: {}", cli.directory.display());

    let report = probediff_core::run_benchmark(&config, &cli.directory)?;

    info!(
        "Probed {} file(s) in {}",
        report.files_processed,
        probediff_core::format_elapsed(report.elapsed)
    );
    Ok(report)
}
