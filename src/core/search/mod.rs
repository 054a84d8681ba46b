//! Key-to-usage search engine.
//!
//! A [`Searcher`] is one search session: it discovers candidate source files
//! once, then answers [`Searcher::search`] for any number of keys. Each search
//! compiles the key's platform patterns into a `RegexSet`, scans every file
//! line by line and filters the raw matches.

pub mod file_scanner;
pub mod filter;
pub mod glob_matcher;
pub mod line_scanner;
pub mod platform;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use colored::Colorize;
use regex::RegexSet;

use crate::core::types::Match;

pub use file_scanner::{ScanResult, scan_files};
pub use filter::{filter_matches, is_translation_file};
pub use glob_matcher::IgnoreMatcher;
pub use platform::Platform;

/// Everything a search session needs, resolved from configuration.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub source_paths: Vec<PathBuf>,
    pub ignores: IgnoreMatcher,
    /// Explicit platform; detected from `source_paths` when `None`.
    pub platform: Option<Platform>,
    /// Lines of context on each side of a match.
    pub context_lines: usize,
    /// Configured translation files, never reported as usages.
    pub translation_files: Vec<PathBuf>,
    pub verbose: bool,
}

pub struct Searcher {
    source_paths: Vec<PathBuf>,
    ignores: IgnoreMatcher,
    platform: Platform,
    context_lines: usize,
    /// Canonical paths of the configured translation files.
    translation_files: HashSet<PathBuf>,
    verbose: bool,

    /// Discovered once on first search.
    scan: OnceLock<ScanResult>,
}

impl Searcher {
    pub fn new(options: SearchOptions) -> Self {
        let platform = options
            .platform
            .unwrap_or_else(|| Platform::detect(&options.source_paths, &options.ignores));

        let translation_files = options
            .translation_files
            .iter()
            .map(|p| canonical(p))
            .collect();

        Self {
            source_paths: options.source_paths,
            ignores: options.ignores,
            platform,
            context_lines: options.context_lines,
            translation_files,
            verbose: options.verbose,
            scan: OnceLock::new(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Candidate source files for this session, discovered on first use.
    pub fn files(&self) -> &[PathBuf] {
        &self.scan_result().files
    }

    /// Directory entries that could not be read during discovery.
    ///
    /// Zero when no search has run yet; this never triggers discovery.
    pub fn skipped_count(&self) -> usize {
        self.scan.get().map_or(0, |scan| scan.skipped_count)
    }

    fn scan_result(&self) -> &ScanResult {
        self.scan.get_or_init(|| {
            scan_files(
                &self.source_paths,
                self.platform.extensions(),
                &self.ignores,
                self.verbose,
            )
        })
    }

    /// Find usages of `key`, in file discovery order then line order.
    pub fn search(&self, key: &str) -> Result<Vec<Match>> {
        let patterns = RegexSet::new(self.platform.patterns(key))
            .with_context(|| format!("Failed to build search patterns for key \"{}\"", key))?;

        let mut matches = Vec::new();
        for file in self.files() {
            match line_scanner::scan_file(file, &patterns, self.context_lines) {
                Ok(found) => matches.extend(found),
                Err(e) => {
                    if self.verbose {
                        eprintln!(
                            "{} Failed to read {}: {}",
                            "warning:".bold().yellow(),
                            file.display(),
                            e
                        );
                    }
                }
            }
        }

        Ok(filter_matches(matches, |path| self.is_definition_file(path)))
    }

    fn is_definition_file(&self, path: &Path) -> bool {
        is_translation_file(path)
            || (!self.translation_files.is_empty()
                && self.translation_files.contains(&canonical(path)))
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
