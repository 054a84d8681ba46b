//! txcontext - translator context for mobile localization keys
//!
//! txcontext reads iOS and Android translation files, finds where each key is
//! used in the app's source code and asks an LLM to describe that usage for
//! translators. Results are written to CSV or JSON and can be written back
//! as comments into `.strings`, `strings.xml` and Swift `comment:` arguments.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (parsers, search, pipeline, writers)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
