// probediff-cli/src/main.rs
//
// Entry point of the probediff binary.
//
// Responsibilities:
// - Parsing arguments, with usage errors ending the process with code 1.
// - Setting up console logging and the optional run log file.
// - Running the benchmark through the library portion of the CLI.
// - Printing the report (text or JSON) to stdout.
// - Mapping fatal errors to their exit codes.

use clap::Parser;
use clap::error::ErrorKind;
use console::style;
use probediff_cli::error::EXIT_USAGE;
use probediff_cli::{Cli, exit_code, logging, output, run_compare};
use probediff_core::CoreError;

use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| cli.log_dir.as_deref().map(logging::timestamped_log_path));
    if let Err(e) = logging::init_logging(cli.verbose, log_file.as_deref()) {
        fail(&e);
    }

    let report = match run_compare(&cli) {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    if cli.json {
        match output::render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&CoreError::OperationFailed(format!("failed to serialize report: {e}"))),
        }
    } else {
        print!("{}", output::render_report(&report));
    }
}

fn fail(error: &CoreError) -> ! {
    log::debug!("Fatal error: {:?}", error);
    eprintln!("{} {}", style("Error:").red().bold().for_stderr(), error);
    process::exit(exit_code(error));
}
