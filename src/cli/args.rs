//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Find key usages, ask the LLM for context and write the results
//! - `init`: Initialize a txcontext configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{
    llm::Provider,
    search::Platform,
    writers::{CommentMode, OutputFormat},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(args)) => args.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExtractArgs {
    /// Path to a config file (default: nearest .txcontextrc.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Translation file(s), comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub translations: Vec<String>,

    /// Source directories or files to search, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub source: Vec<String>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// LLM provider
    #[arg(short, long, value_enum)]
    pub provider: Option<Provider>,

    /// LLM model to use
    #[arg(short, long, env = "TXCONTEXT_MODEL")]
    pub model: Option<String>,

    /// Only process matching keys (comma-separated, `*` matches anything)
    #[arg(short, long)]
    pub keys: Option<String>,

    /// Number of concurrent LLM requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Source platform (default: detected from the source paths)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Show what would be processed without calling the LLM
    #[arg(long)]
    pub dry_run: bool,

    /// Disable the result cache
    #[arg(long)]
    pub no_cache: bool,

    /// Delete cached results before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Write context comments back into translation files (.strings, strings.xml)
    #[arg(long)]
    pub write_back: bool,

    /// Write context into `comment:` arguments of Swift source code
    #[arg(long)]
    pub write_back_to_code: bool,

    /// Only process keys changed since this git ref (e.g. main, origin/main)
    #[arg(long)]
    pub diff_base: Option<String>,

    /// Prefix for context comments (an empty string disables it)
    #[arg(long)]
    pub context_prefix: Option<String>,

    /// How to combine context with existing comments
    #[arg(long, value_enum)]
    pub context_mode: Option<CommentMode>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translator context for localization keys from source code
    Extract(ExtractArgs),
    /// Initialize a new .txcontextrc.json configuration file
    Init(InitArgs),
}
