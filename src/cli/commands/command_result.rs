use std::path::PathBuf;

use crate::core::{
    pipeline::OutcomeCounts,
    writers::{OutputFormat, WriteBackStats},
};

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    DryRun(DryRunSummary),
    /// Nothing matched the filters; carries the message to show.
    NothingToDo(String),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub total: usize,
    pub counts: OutcomeCounts,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Present when `--write-back` was requested.
    pub write_back: Option<WriteBackStats>,
    /// Present when `--write-back-to-code` was requested.
    pub code_write_back: Option<WriteBackStats>,
    /// Directory entries that could not be read during discovery.
    pub skipped_entries: usize,
    /// Cache reads and writes that failed.
    pub cache_errors: usize,
}

#[derive(Debug)]
pub struct DryRunSummary {
    pub total: usize,
    /// `(key, text)` of the first entries that would be processed.
    pub preview: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    pub overwritten: bool,
}

/// Result of running txcontext commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Entries whose result carries an error.
    pub error_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        Self {
            summary,
            error_count: 0,
            exit_on_errors: true,
        }
    }
}
