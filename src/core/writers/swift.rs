//! Comment write-back for `comment:` arguments of Swift localization calls.
//!
//! ```swift
//! NSLocalizedString("common.save", comment: "Context: Saves the form")
//! ```

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::{CommentPolicy, CommentWriter, ResultsByKey};

pub const DEFAULT_SWIFT_FUNCTIONS: &[&str] = &["NSLocalizedString", "String(localized:", "Text("];

/// Body of a Swift string literal, escapes included.
const STRING_BODY: &str = r#"((?:[^"\\]|\\.)*)"#;

#[derive(Debug, Clone)]
pub struct SwiftWriter {
    policy: CommentPolicy,
    functions: Vec<String>,
}

impl Default for SwiftWriter {
    fn default() -> Self {
        Self::new(CommentPolicy::default(), &[])
    }
}

impl SwiftWriter {
    /// `functions` falls back to [`DEFAULT_SWIFT_FUNCTIONS`] when empty.
    pub fn new(policy: CommentPolicy, functions: &[String]) -> Self {
        let functions = if functions.is_empty() {
            DEFAULT_SWIFT_FUNCTIONS.iter().map(|f| f.to_string()).collect()
        } else {
            functions.to_vec()
        };
        Self { policy, functions }
    }

    /// Call-site pattern for `key` in `function`, capturing the comment body.
    fn pattern(function: &str, key: &str) -> Result<Regex> {
        let key = regex::escape(key);
        let pattern = match function {
            "NSLocalizedString" => {
                format!(r#"NSLocalizedString\(\s*"{key}"[^)]*?comment:\s*"{STRING_BODY}"[^)]*\)"#)
            }
            "String(localized:" => format!(
                r#"String\(\s*localized:\s*"{key}"[^)]*?comment:\s*"{STRING_BODY}"[^)]*\)"#
            ),
            "Text(" => format!(r#"Text\([^)]*?"{key}"[^)]*?comment:\s*"{STRING_BODY}"[^)]*\)"#),
            custom => {
                let name = regex::escape(custom.trim_end_matches('('));
                format!(r#"{name}\([^)]*?"{key}"[^)]*?comment:\s*"{STRING_BODY}"[^)]*\)"#)
            }
        };
        Regex::new(&pattern)
            .with_context(|| format!("Invalid call pattern for Swift function \"{}\"", function))
    }

    /// Rewrite the comment body of one matched call.
    ///
    /// The existing body stays in its escaped source form, so escapes such as
    /// `\u{00A0}`, `\0` or `\(x)` survive byte for byte. Only the new context
    /// line is escaped.
    fn rewrite_call(&self, caps: &Captures, description: &str) -> String {
        let (Some(call), Some(body)) = (caps.get(0), caps.get(1)) else {
            return caps[0].to_string();
        };
        let policy = CommentPolicy::new(escape(&self.policy.prefix), self.policy.mode);
        let updated = policy.resolve(body.as_str(), &escape(description), " ");
        if updated == body.as_str() {
            return call.as_str().to_string();
        }

        let whole = call.as_str();
        let (from, to) = (body.start() - call.start(), body.end() - call.start());
        format!("{}{}{}", &whole[..from], updated, &whole[to..])
    }
}

impl CommentWriter for SwiftWriter {
    fn update_content(&self, content: &str, results: &ResultsByKey<'_>) -> Result<String> {
        let mut keys: Vec<&&str> = results.keys().collect();
        keys.sort();

        let mut content = content.to_string();
        for key in keys {
            let description = results[*key].description.replace(['\r', '\n'], " ");
            let description = description.trim();
            for function in &self.functions {
                let pattern = Self::pattern(function, key)?;
                content = pattern
                    .replace_all(&content, |caps: &Captures| self.rewrite_call(caps, description))
                    .into_owned();
            }
        }
        Ok(content)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
