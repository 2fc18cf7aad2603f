//! Rendering of the final run report.
//!
//! The text report is a `Display` impl, so it can be rendered into a string
//! and tested without a terminal. Styling goes through `console`, which drops
//! the escape codes when stdout is not a terminal or colors were disabled.

use console::style;
use probediff_core::{Backend, RunReport, format_elapsed, format_rate};

use std::fmt;

fn heading(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", style(format!("===== {} =====", text.to_uppercase())).cyan().bold())
}

fn extension_label(ext: &str) -> &str {
    if ext.is_empty() { "(none)" } else { ext }
}

/// Human readable form of a [`RunReport`].
pub struct TextReport<'a>(pub &'a RunReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        heading(f, "Summary")?;
        writeln!(
            f,
            "Took {} for {} * 2 items ({:.2} i/s).",
            style(format_elapsed(report.elapsed)).bold(),
            report.files_processed,
            report.overall_throughput()
        )?;

        if !report.extension_stats.is_empty() {
            heading(f, "Extensions")?;
            for stats in report.extension_stats.values() {
                writeln!(
                    f,
                    "Extension: {}, Count: {}, Time embedded: {}, Speed embedded: {}, Time external: {}, Speed external: {}.",
                    style(&stats.extension).bold(),
                    stats.file_count,
                    format_elapsed(stats.embedded_time),
                    format_rate(stats.throughput(Backend::Embedded)),
                    format_elapsed(stats.external_time),
                    format_rate(stats.throughput(Backend::External)),
                )?;
            }
        }

        if !report.skipped_extensions.is_empty() {
            heading(f, "Skipped")?;
            for ext in &report.skipped_extensions {
                writeln!(f, "Skipped Extension: {}", extension_label(ext))?;
            }
        }

        if !report.unsupported_extensions.is_empty() {
            let labels: Vec<&str> = report
                .unsupported_extensions
                .iter()
                .map(|ext| extension_label(ext))
                .collect();
            writeln!(f)?;
            writeln!(
                f,
                "{} The embedded backend cannot read {}; those files are listed as embedded failures.",
                style("Note:").yellow().bold(),
                labels.join(", ")
            )?;
        }

        if !report.vanished_files.is_empty() || !report.probe_failures.is_empty() {
            heading(f, "Probe failures")?;
            for path in &report.vanished_files {
                writeln!(f, "{} File {} not found!", style("✗").red(), path.display())?;
            }
            for failure in &report.probe_failures {
                writeln!(
                    f,
                    "{} {} probe failed on {}: {}",
                    style("✗").red(),
                    failure.backend,
                    failure.path.display(),
                    failure.reason
                )?;
            }
        }

        heading(f, "Disagreements")?;
        if report.disagreements.is_empty() {
            writeln!(f, "{} Both probes agree on every file.", style("✓").green().bold())?;
        } else {
            for record in &report.disagreements {
                writeln!(
                    f,
                    "{} Name: {}; Streams embedded: {}; Streams external: {};",
                    style("Failure:").yellow().bold(),
                    record.path.display(),
                    record.embedded,
                    record.external
                )?;
            }
        }

        Ok(())
    }
}

/// Renders the human readable report.
pub fn render_report(report: &RunReport) -> String {
    TextReport(report).to_string()
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
