//! Summary formatting and printing.
//!
//! Summaries go to stdout; warnings go to stderr.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, DryRunSummary, ExtractSummary, InitSummary};
use crate::{
    core::writers::{OutputFormat, WriteBackStats},
    utils::truncate,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Display width of texts in the dry-run preview.
const PREVIEW_TEXT_WIDTH: usize = 50;

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract(summary, result.error_count, verbose, &mut stdout);
            let mut stderr = io::stderr().lock();
            print_skipped_warning(summary.skipped_entries, verbose, &mut stderr);
            print_cache_warning(summary.cache_errors, verbose, &mut stderr);
        }
        CommandSummary::DryRun(summary) => print_dry_run(summary, &mut stdout),
        CommandSummary::NothingToDo(message) => {
            let _ = writeln!(stdout, "{}", message);
        }
        CommandSummary::Init(summary) => print_init(summary, &mut stdout),
    }
}

fn print_extract<W: Write>(
    summary: &ExtractSummary,
    error_count: usize,
    verbose: bool,
    writer: &mut W,
) {
    let counts = &summary.counts;
    let _ = writeln!(
        writer,
        "{} Processed {} {}: {} described, {} cached, {} without usage",
        SUCCESS_MARK.green(),
        summary.total,
        plural(summary.total, "key", "keys"),
        counts.described,
        counts.cached,
        counts.no_usage
    );

    if error_count > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} failed (see the error {})",
            FAILURE_MARK.red(),
            error_count,
            plural(error_count, "key", "keys"),
            match summary.format {
                OutputFormat::Csv => "column",
                OutputFormat::Json => "field",
            }
        );
    }

    let _ = writeln!(
        writer,
        "{} Wrote {} {} to {}",
        SUCCESS_MARK.green(),
        summary.total,
        plural(summary.total, "result", "results"),
        summary.output.display()
    );

    if let Some(stats) = &summary.write_back {
        print_write_back(stats, "translation", verbose, writer);
    }
    if let Some(stats) = &summary.code_write_back {
        print_write_back(stats, "Swift", verbose, writer);
    }
}

fn print_write_back<W: Write>(stats: &WriteBackStats, kind: &str, verbose: bool, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} Updated {} {} {} with context comments",
        SUCCESS_MARK.green(),
        stats.files_modified,
        kind,
        plural(stats.files_modified, "file", "files")
    );
    if verbose {
        for path in &stats.modified_paths {
            let _ = writeln!(writer, "  - {}", path.display());
        }
    }
    if stats.skipped > 0 {
        let _ = writeln!(
            writer,
            "  skipped {} {} without comment support",
            stats.skipped,
            plural(stats.skipped, "file", "files")
        );
    }
}

fn print_dry_run<W: Write>(summary: &DryRunSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} would process {} {}:",
        "Dry run:".yellow().bold(),
        summary.total,
        plural(summary.total, "key", "keys")
    );
    for (key, text) in &summary.preview {
        let _ = writeln!(writer, "  - {}: {}", key, truncate(text, PREVIEW_TEXT_WIDTH));
    }
    let remaining = summary.total.saturating_sub(summary.preview.len());
    if remaining > 0 {
        let _ = writeln!(writer, "  ... and {} more", remaining);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    let verb = if summary.overwritten { "Overwrote" } else { "Created" };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("{} {}", verb, summary.path.display()).green()
    );
}

/// Print a warning about directory entries that could not be read.
fn print_skipped_warning<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read during discovery (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print a warning about failed cache reads and writes.
fn print_cache_warning<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} cache {} failed and {} treated as {} (use {} for details)",
            "warning:".bold().yellow(),
            count,
            plural(count, "operation", "operations"),
            plural(count, "was", "were"),
            plural(count, "a miss", "misses"),
            "-v".cyan()
        );
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
