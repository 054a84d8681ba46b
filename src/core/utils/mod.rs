//! Small helpers shared by the core modules.

pub mod key_pattern;

pub use key_pattern::{KeyFilter, wildcard_matches};
