use clap::ValueEnum;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTEXT_PREFIX: &str = "Context: ";

/// How a new context line combines with an existing comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommentMode {
    /// The whole comment becomes the context line.
    #[default]
    Replace,
    /// The context line is added to, or updated within, the existing comment.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPolicy {
    pub prefix: String,
    pub mode: CommentMode,
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CONTEXT_PREFIX.to_string(),
            mode: CommentMode::Replace,
        }
    }
}

impl CommentPolicy {
    pub fn new(prefix: impl Into<String>, mode: CommentMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    pub fn context_line(&self, description: &str) -> String {
        format!("{}{}", self.prefix, description)
    }

    /// Comment text to store given the `existing` comment text.
    ///
    /// `description` must already be escaped for the target format and
    /// `separator` is the format's natural separator between comment parts.
    pub fn resolve(&self, existing: &str, description: &str, separator: &str) -> String {
        let line = self.context_line(description);
        let existing = existing.trim();

        if existing.is_empty() || self.mode == CommentMode::Replace {
            return line;
        }

        if !self.prefix.is_empty() && existing.contains(&self.prefix) {
            // Update the previously inserted fragment, from the prefix to end of line
            let fragment = Regex::new(&format!("{}[^\\n]*", regex::escape(&self.prefix)));
            if let Ok(fragment) = fragment {
                return fragment
                    .replace_all(existing, NoExpand(&line))
                    .into_owned();
            }
        }

        if existing.contains(&line) {
            return existing.to_string();
        }

        format!("{}{}{}", existing, separator, line)
    }
}
