//! Comment write-back for Apple `.strings` files.
//!
//! The file is re-emitted line by line. The comment of an entry is the last
//! non-blank line before it when that line is a single-line `/* ... */`
//! comment and not a section marker.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{CommentPolicy, CommentWriter, ResultsByKey, line_ending};

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\s*)"([^"]+)"\s*=\s*"(.*)"\s*;\s*$"#).unwrap());

static COMMENT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)/\*(.*)\*/\s*$").unwrap());

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/\*\s*(MARK|TODO|FIXME|#pragma)").unwrap());

#[derive(Debug, Clone, Default)]
pub struct StringsWriter {
    policy: CommentPolicy,
}

impl StringsWriter {
    pub fn new(policy: CommentPolicy) -> Self {
        Self { policy }
    }
}

impl CommentWriter for StringsWriter {
    fn update_content(&self, content: &str, results: &ResultsByKey<'_>) -> Result<String> {
        let mut output: Vec<String> = Vec::new();

        for line in content.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\r', '\n']);

            if let Some(caps) = ENTRY_RE.captures(bare) {
                if let Some(result) = results.get(&caps[2]) {
                    let description = escape_comment(&result.description);
                    let previous = output.iter().rposition(|l| !l.trim().is_empty());
                    let comment = previous.and_then(|i| {
                        let prev = output[i].trim_end_matches(['\r', '\n']);
                        if MARKER_RE.is_match(prev) {
                            return None;
                        }
                        COMMENT_LINE_RE
                            .captures(prev)
                            .map(|c| (i, c[1].to_string(), c[2].trim().to_string()))
                    });

                    match comment {
                        Some((i, indent, existing)) => {
                            let updated = self.policy.resolve(&existing, &description, " ");
                            if updated != existing {
                                let eol = line_ending(&output[i]).to_string();
                                output[i] = format!("{}/* {} */{}", indent, updated, eol);
                            }
                        }
                        None => {
                            let context = self.policy.context_line(&description);
                            output.push(format!("{}/* {} */{}", &caps[1], context, line_ending(line)));
                        }
                    }
                }
            }

            output.push(line.to_string());
        }

        Ok(output.concat())
    }
}

/// Neutralize comment delimiters and fold the text onto one line.
fn escape_comment(text: &str) -> String {
    text.replace("*/", "* /")
        .replace("/*", "/ *")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}
