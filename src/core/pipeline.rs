//! Concurrent extraction pipeline.
//!
//! Each entry moves through
//! `cache check → (cached | search) → (no usage | LLM call) → result`.
//! Entries run on a dedicated rayon pool with `concurrency` threads, and an
//! [`AdmissionGate`] bounds in-flight LLM calls to the same limit. Failures
//! never escape an entry: they become results with `error` set.

use std::sync::{
    Condvar, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use crate::core::{
    cache::Cache,
    llm::{ContextGenerator, ContextRequest},
    search::Searcher,
    types::{ExtractionResult, Match, TranslationEntry},
};

/// Counting permit for a bounded number of concurrent holders.
#[derive(Debug)]
pub struct AdmissionGate {
    available: Mutex<usize>,
    released: Condvar,
}

/// Held while a permit is in use; returns it on drop.
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    pub fn new(permits: usize) -> Self {
        Self {
            available: Mutex::new(permits.max(1)),
            released: Condvar::new(),
        }
    }

    /// Block until a permit is free.
    pub fn acquire(&self) -> Permit<'_> {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { gate: self }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut available = self
            .gate
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.gate.released.notify_one();
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Worker threads and concurrent LLM calls.
    pub concurrency: usize,
    /// Matches sent to the LLM per key, first in discovery order.
    pub max_matches_per_key: usize,
    pub model: Option<String>,
    pub verbose: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_matches_per_key: 3,
            model: None,
            verbose: false,
        }
    }
}

/// How a single entry was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Cached,
    NoUsage,
    Described,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub cached: usize,
    pub no_usage: usize,
    pub described: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Cached => self.cached += 1,
            EntryOutcome::NoUsage => self.no_usage += 1,
            EntryOutcome::Described => self.described += 1,
            EntryOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// One result per input entry, sorted by key.
    pub results: Vec<ExtractionResult>,
    /// Results carrying an `error`.
    pub error_count: usize,
    pub counts: OutcomeCounts,
}

/// Process every entry and collect exactly one result per entry.
pub fn run_pipeline<G>(
    entries: &[TranslationEntry],
    searcher: &Searcher,
    generator: &G,
    cache: &Cache,
    options: &PipelineOptions,
) -> Result<ExtractionReport>
where
    G: ContextGenerator + Sync,
{
    let concurrency = options.concurrency.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build()
        .context("Failed to start worker pool")?;

    let worker = EntryWorker {
        searcher,
        generator,
        cache,
        options,
        gate: AdmissionGate::new(concurrency),
        done: AtomicUsize::new(0),
        total: entries.len(),
    };

    let processed: Vec<(ExtractionResult, EntryOutcome)> =
        pool.install(|| entries.par_iter().map(|entry| worker.process(entry)).collect());

    let mut report = ExtractionReport::default();
    for (result, outcome) in processed {
        report.counts.record(outcome);
        if result.error.is_some() {
            report.error_count += 1;
        }
        report.results.push(result);
    }
    report.results.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(report)
}

struct EntryWorker<'a, G> {
    searcher: &'a Searcher,
    generator: &'a G,
    cache: &'a Cache,
    options: &'a PipelineOptions,
    gate: AdmissionGate,
    done: AtomicUsize,
    total: usize,
}

impl<G: ContextGenerator + Sync> EntryWorker<'_, G> {
    fn process(&self, entry: &TranslationEntry) -> (ExtractionResult, EntryOutcome) {
        let (result, outcome) = self.resolve(entry).unwrap_or_else(|e| {
            (
                ExtractionResult::failed(entry, format!("{:#}", e)),
                EntryOutcome::Failed,
            )
        });

        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.options.verbose {
            let mark = match outcome {
                EntryOutcome::Failed => "✘".red(),
                _ => "✓".green(),
            };
            eprintln!("[{}/{}] {} {}", done, self.total, mark, entry.key);
        }

        (result, outcome)
    }

    fn resolve(&self, entry: &TranslationEntry) -> Result<(ExtractionResult, EntryOutcome)> {
        if let Some(cached) = self.cache.get(&entry.key, &entry.text) {
            return Ok((cached, EntryOutcome::Cached));
        }

        let mut matches = self.searcher.search(&entry.key)?;
        if matches.is_empty() {
            let result = ExtractionResult::no_usage(entry);
            self.cache.set(&entry.key, &entry.text, &result);
            return Ok((result, EntryOutcome::NoUsage));
        }
        matches.truncate(self.options.max_matches_per_key.max(1));

        let context = {
            let _permit = self.gate.acquire();
            self.generator.generate_context(&ContextRequest {
                key: &entry.key,
                text: &entry.text,
                matches: &matches,
                model: self.options.model.as_deref(),
            })?
        };

        let result = ExtractionResult {
            description: context.description,
            ui_element: context.ui_element,
            tone: context.tone,
            max_length: context.max_length,
            locations: matches.iter().map(Match::location).collect(),
            error: context.error,
            ..ExtractionResult::new(entry, "")
        };

        if result.error.is_some() {
            return Ok((result, EntryOutcome::Failed));
        }
        self.cache.set(&entry.key, &entry.text, &result);
        Ok((result, EntryOutcome::Described))
    }
}
