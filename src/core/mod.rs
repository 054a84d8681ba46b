//! Extraction engine: parsing, usage search, LLM pipeline and write-back.

pub mod cache;
pub mod git_diff;
pub mod llm;
pub mod parsers;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod utils;
pub mod writers;

pub use pipeline::{ExtractionReport, PipelineOptions, run_pipeline};
pub use types::{ExtractionResult, Match, TranslationEntry};
