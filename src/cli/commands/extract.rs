use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use super::super::args::ExtractArgs;
use super::{CommandResult, CommandSummary, DryRunSummary, ExtractSummary};
use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        cache::Cache,
        git_diff::{GitDiff, entry_changed},
        llm::LlmClient,
        parsers::parse_translation_file,
        pipeline::{PipelineOptions, run_pipeline},
        search::{IgnoreMatcher, SearchOptions, Searcher, scan_files},
        types::{ExtractionResult, TranslationEntry},
        utils::KeyFilter,
        writers::{
            CommentPolicy, SwiftWriter, WriteBackStats, WriteBackTarget, results_by_key,
            write_results,
        },
    },
};

/// Entries listed by `--dry-run`.
pub const DRY_RUN_PREVIEW_LIMIT: usize = 20;

pub fn extract(args: &ExtractArgs, cwd: &Path) -> Result<CommandResult> {
    let mut config = load_config(cwd, args.config.as_deref())?.config;
    apply_overrides(&mut config, args);
    config.validate()?;

    if config.translations.is_empty() {
        bail!(
            "No translation files given (use --translations or set 'translations' in {})",
            CONFIG_FILE_NAME
        );
    }

    let diff = match &args.diff_base {
        Some(base) => Some(checked_git_diff(base, cwd)?),
        None => None,
    };

    let verbose = args.verbose;
    let translation_files = existing_translation_files(&config.translation_paths());
    let mut entries = load_entries(&translation_files)?;

    if let Some(keys) = &args.keys {
        let filter = KeyFilter::parse(keys);
        entries.retain(|entry| filter.matches(&entry.key));
    }

    if let Some(diff) = &diff {
        let changed = diff.changed_keys(&translation_files)?;
        if changed.is_empty() {
            return Ok(nothing_to_do(format!(
                "No changes detected in translation files since {}",
                diff.base_ref()
            )));
        }
        if verbose {
            eprintln!("Found {} changed keys in git diff", changed.len());
        }
        entries.retain(|entry| entry_changed(entry, &changed));
    }

    if entries.is_empty() {
        let message = match &diff {
            Some(diff) => format!("No changed translation keys found since {}.", diff.base_ref()),
            None => "No translation entries found.".to_string(),
        };
        return Ok(nothing_to_do(message));
    }

    if args.dry_run {
        return Ok(CommandResult::new(CommandSummary::DryRun(DryRunSummary {
            total: entries.len(),
            preview: entries
                .iter()
                .take(DRY_RUN_PREVIEW_LIMIT)
                .map(|e| (e.key.clone(), e.text.clone()))
                .collect(),
        })));
    }

    let client = LlmClient::for_provider(config.provider)?;
    let ignores = IgnoreMatcher::new(&config.ignore_patterns)?;
    let source_paths = config.source_path_bufs();

    let searcher = Searcher::new(SearchOptions {
        source_paths: source_paths.clone(),
        ignores: ignores.clone(),
        platform: config.platform,
        context_lines: config.context_lines,
        translation_files: translation_files.clone(),
        verbose,
    });
    let cache = Cache::new(&config.cache_dir, !args.no_cache, verbose);
    if args.clear_cache {
        cache
            .clear()
            .with_context(|| format!("Failed to clear cache directory {}", config.cache_dir))?;
    }

    let report = run_pipeline(
        &entries,
        &searcher,
        &client,
        &cache,
        &PipelineOptions {
            concurrency: config.concurrency,
            max_matches_per_key: config.max_matches_per_key,
            model: config.model.clone(),
            verbose,
        },
    )?;

    let output = PathBuf::from(&config.output);
    write_results(&report.results, &output, config.format)?;

    let policy = CommentPolicy::new(config.context_prefix.clone(), config.context_mode);
    let write_back = if config.write_back {
        Some(write_back_translations(
            &translation_files,
            &report.results,
            &policy,
        )?)
    } else {
        None
    };
    let code_write_back = if config.write_back_to_code {
        let swift_files = scan_files(&source_paths, &["swift"], &ignores, verbose).files;
        let writer = SwiftWriter::new(policy, &config.swift_functions);
        Some(write_back_code(&swift_files, &report.results, writer)?)
    } else {
        None
    };

    Ok(CommandResult {
        error_count: report.error_count,
        ..CommandResult::new(CommandSummary::Extract(ExtractSummary {
            total: report.results.len(),
            counts: report.counts,
            output,
            format: config.format,
            write_back,
            code_write_back,
            skipped_entries: searcher.skipped_count(),
            cache_errors: cache.error_count(),
        }))
    })
}

/// CLI flags take priority over the config file.
fn apply_overrides(config: &mut Config, args: &ExtractArgs) {
    if !args.translations.is_empty() {
        config.translations = args.translations.clone();
    }
    if !args.source.is_empty() {
        config.source_paths = args.source.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = Some(model.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(platform) = args.platform {
        config.platform = Some(platform);
    }
    if args.write_back {
        config.write_back = true;
    }
    if args.write_back_to_code {
        config.write_back_to_code = true;
    }
    if let Some(prefix) = &args.context_prefix {
        config.context_prefix = prefix.clone();
    }
    if let Some(mode) = args.context_mode {
        config.context_mode = mode;
    }
}

fn checked_git_diff(base: &str, cwd: &Path) -> Result<GitDiff> {
    let diff = GitDiff::new(base).in_dir(cwd);
    if !diff.is_available() {
        bail!("--diff-base requires a git repository");
    }
    if !diff.base_ref_exists() {
        bail!(
            "git ref '{}' not found (try origin/main, main, or a commit SHA)",
            base
        );
    }
    Ok(diff)
}

/// Keep the translation files that exist, warning about the rest.
fn existing_translation_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                eprintln!(
                    "{} Translation file not found: {}",
                    "warning:".bold().yellow(),
                    path.display()
                );
            }
            exists
        })
        .cloned()
        .collect()
}

fn load_entries(files: &[PathBuf]) -> Result<Vec<TranslationEntry>> {
    let mut entries = Vec::new();
    for file in files {
        let parsed = parse_translation_file(file)
            .with_context(|| format!("Failed to load translations from {}", file.display()))?;
        entries.extend(parsed);
    }
    Ok(entries)
}

fn write_back_translations(
    files: &[PathBuf],
    results: &[ExtractionResult],
    policy: &CommentPolicy,
) -> Result<WriteBackStats> {
    let by_key = results_by_key(results);
    let mut stats = WriteBackStats::default();

    for file in files {
        match WriteBackTarget::for_translation_file(file, policy) {
            Some(target) => {
                let changed = target.update_file(file, &by_key)?;
                stats.record(file, changed);
            }
            None => stats.skipped += 1,
        }
    }

    Ok(stats)
}

fn write_back_code(
    files: &[PathBuf],
    results: &[ExtractionResult],
    writer: SwiftWriter,
) -> Result<WriteBackStats> {
    let by_key = results_by_key(results);
    let target = WriteBackTarget::from(writer);
    let mut stats = WriteBackStats::default();

    for file in files {
        let changed = target.update_file(file, &by_key)?;
        stats.record(file, changed);
    }

    Ok(stats)
}

fn nothing_to_do(message: String) -> CommandResult {
    CommandResult::new(CommandSummary::NothingToDo(message))
}
