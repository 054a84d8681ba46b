//! Comment write-back for Android `strings.xml`.
//!
//! The document is read as a `quick-xml` event stream while tracking each
//! event's byte span. Comments are edited by splicing those spans into the
//! original text, so everything else keeps its exact bytes.

use std::ops::Range;

use anyhow::{Context, Result};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{CommentPolicy, CommentWriter, ResultsByKey};

#[derive(Debug, Clone, Default)]
pub struct AndroidXmlWriter {
    policy: CommentPolicy,
}

impl AndroidXmlWriter {
    pub fn new(policy: CommentPolicy) -> Self {
        Self { policy }
    }
}

/// Comment directly preceding the next sibling, with its span.
struct PendingComment {
    span: Range<usize>,
    text: String,
}

impl CommentWriter for AndroidXmlWriter {
    fn update_content(&self, content: &str, results: &ResultsByKey<'_>) -> Result<String> {
        let mut reader = Reader::from_str(content);
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut depth = 0usize;
        let mut pending: Option<PendingComment> = None;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .with_context(|| format!("Malformed XML at byte {}", start))?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(e) if depth == 1 => {
                    let comment = pending.take();
                    edits.extend(self.edit_for(&e, start, comment, content, results)?);
                    depth += 1;
                }
                Event::Empty(e) if depth == 1 => {
                    let comment = pending.take();
                    edits.extend(self.edit_for(&e, start, comment, content, results)?);
                }
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Comment(c) if depth == 1 => {
                    pending = Some(PendingComment {
                        span: start..end,
                        text: String::from_utf8_lossy(&c).into_owned(),
                    });
                }
                Event::Text(t) if depth == 1 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        pending = None;
                    }
                }
                Event::Eof => break,
                _ => {
                    if depth == 1 {
                        pending = None;
                    }
                }
            }
        }

        Ok(apply_edits(content, edits))
    }
}

impl AndroidXmlWriter {
    fn edit_for(
        &self,
        element: &BytesStart,
        start: usize,
        comment: Option<PendingComment>,
        content: &str,
        results: &ResultsByKey<'_>,
    ) -> Result<Option<(Range<usize>, String)>> {
        if element.name().as_ref() != b"string" {
            return Ok(None);
        }
        let Some(name) = name_attribute(element)? else {
            return Ok(None);
        };
        let Some(result) = results.get(name.as_str()) else {
            return Ok(None);
        };

        let indent = indentation_before(content, start);
        let description = escape_comment(&result.description);

        Ok(match comment {
            Some(comment) => {
                let existing = comment.text.trim();
                let separator = format!("\n{}", indent);
                let updated = self.policy.resolve(existing, &description, &separator);
                (updated != existing).then(|| (comment.span, format!("<!-- {} -->", updated)))
            }
            None => {
                let line = self.policy.context_line(&description);
                Some((start..start, format!("<!-- {} -->\n{}", line, indent)))
            }
        })
    }
}

fn name_attribute(element: &BytesStart) -> Result<Option<String>> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.context("Malformed attribute")?;
        if attr.key.as_ref() == b"name" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Whitespace between the start of the line and `pos`, or empty if the
/// element does not start its line.
fn indentation_before(content: &str, pos: usize) -> &str {
    let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &content[line_start..pos];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

/// Remove every `--` and fold the text onto one line.
fn escape_comment(text: &str) -> String {
    let mut escaped = text.replace(['\r', '\n'], " ");
    while escaped.contains("--") {
        escaped = escaped.replace("--", "-");
    }
    escaped.trim().to_string()
}

/// Splice non-overlapping edits, given in document order.
fn apply_edits(content: &str, edits: Vec<(Range<usize>, String)>) -> String {
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for (span, replacement) in edits {
        output.push_str(&content[cursor..span.start]);
        output.push_str(&replacement);
        cursor = span.end;
    }
    output.push_str(&content[cursor..]);
    output
}
