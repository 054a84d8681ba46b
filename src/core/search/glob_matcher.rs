use std::path::Path;

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

/// `*` and `?` stay within one path segment, `**` crosses segments.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Ignore globs compiled once per run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    /// Compile ignore globs. An invalid pattern is a configuration error.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).with_context(|| format!("Invalid ignore glob pattern: \"{}\"", p))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check `path` relative to the `root` it was found under.
    ///
    /// Directories above the root never take part, so `**/build/**` does not
    /// drop a whole root that lives under a `build` folder. A path outside
    /// `root` is matched as given. The root itself is never ignored.
    pub fn is_ignored(&self, path: &Path, root: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let candidate = match path.strip_prefix(root) {
            Ok(relative) => normalize(relative),
            Err(_) => normalize(path),
        };
        if candidate.is_empty() {
            return false;
        }

        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(&candidate, MATCH_OPTIONS))
    }
}

fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    s.strip_prefix("./").map(str::to_string).unwrap_or(s)
}
