//! Apple `.strings` parser.
//!
//! ```text
//! /* Title of the settings screen */
//! "settings.title" = "Settings";
//! ```

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::core::types::TranslationEntry;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"([^"]+)"\s*=\s*"(.*)"\s*;\s*$"#).unwrap());

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*\s*(.*?)\s*\*/").unwrap());

/// Decode file bytes, honoring UTF-16 byte order marks.
pub fn decode(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).ok(),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Parse `.strings` content.
///
/// The most recent `/* ... */` comment is attached to the next entry as
/// `metadata.comment` and then consumed.
pub fn parse(content: &str, source_file: &Path) -> Vec<TranslationEntry> {
    let mut entries = Vec::new();
    let mut pending_comment: Option<String> = None;

    for line in content.lines() {
        if let Some(caps) = COMMENT_RE.captures(line) {
            pending_comment = Some(caps[1].trim().to_string());
        }

        let rest = COMMENT_RE.replace_all(line, "");
        if let Some(caps) = ENTRY_RE.captures(&rest) {
            let mut entry = TranslationEntry::new(&caps[1], unescape(&caps[2]), source_file);
            if let Some(comment) = pending_comment.take() {
                entry = entry.with_metadata("comment", comment);
            }
            entries.push(entry);
        }
    }

    entries
}

/// Resolve `\"`, `\n`, `\t` and `\\`. Unknown escapes are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
