//! Common utility functions shared across the codebase.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const OMISSION: &str = "...";

/// Shortens `text` to at most `width` display columns, ending with `...`
/// when anything was cut.
///
/// # Examples
///
/// ```
/// use txcontext::utils::truncate;
///
/// assert_eq!(truncate("Save", 10), "Save");
/// assert_eq!(truncate("Save your changes", 10), "Save yo...");
/// assert_eq!(truncate("保存して終了", 8), "保存...");
/// ```
pub fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }

    let budget = width.saturating_sub(OMISSION.len());
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(OMISSION);
    out
}
