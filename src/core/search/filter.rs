use std::{collections::HashSet, path::Path, sync::LazyLock};

use regex::RegexSet;

use crate::core::types::Match;

/// Line shapes that look like key usage but are not localization calls.
static FALSE_POSITIVE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // Comparisons against a string literal: == "yes", "yes" ==, != "no", "no" !=
        r#"==\s*@?["']"#,
        r#"["']\s*=="#,
        r#"!=\s*@?["']"#,
        r#"["']\s*!="#,
        // Trailing empty-argument call: .apply(), .clear();
        r"\.\w+\(\s*\)\s*[;,]?\s*$",
        // Java/Kotlin equality helpers
        r#"\.equals\(\s*["']"#,
        r#"contentEquals\(\s*["']"#,
        // Dictionary access by string literal: map["key"]
        r#"\[\s*@?["'][^"'\]]*["']\s*\]"#,
    ])
    .unwrap()
});

/// Clean up raw matches for one key.
///
/// Duplicates at the same `(file, line)` are dropped first, keeping the
/// first occurrence, then false positives, then matches located in
/// translation-definition files.
pub fn filter_matches(
    matches: Vec<Match>,
    is_definition_file: impl Fn(&Path) -> bool,
) -> Vec<Match> {
    let mut seen = HashSet::new();

    matches
        .into_iter()
        .filter(|m| seen.insert((m.file.clone(), m.line)))
        .filter(|m| !is_false_positive(&m.match_line))
        .filter(|m| !is_definition_file(&m.file))
        .collect()
}

pub fn is_false_positive(line: &str) -> bool {
    !line.is_empty() && FALSE_POSITIVE_PATTERNS.is_match(line)
}

/// True for files that define translations rather than use them.
pub fn is_translation_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("strings" | "stringsdict") => true,
        Some("xml") => {
            name.as_deref() == Some("strings.xml")
                || path
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .is_some_and(|dir| dir.starts_with("values"))
                    && path.components().any(|c| c.as_os_str() == "res")
        }
        _ => false,
    }
}
