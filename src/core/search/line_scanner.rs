use std::{fs, io, path::Path};

use regex::RegexSet;

use crate::core::types::Match;

/// Prefix marking the matched line inside a context window.
pub const MATCH_MARKER: &str = ">>> ";

/// Scan one file for lines matching any pattern in `patterns`.
///
/// Missing, unreadable and directory paths yield no matches, as does binary or
/// non-UTF-8 content. Any other I/O error is returned to the caller.
pub fn scan_file(path: &Path, patterns: &RegexSet, radius: usize) -> io::Result<Vec<Match>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if is_skippable(&e) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    if bytes.contains(&0) {
        return Ok(Vec::new());
    }
    let Ok(content) = String::from_utf8(bytes) else {
        return Ok(Vec::new());
    };

    Ok(scan_content(path, &content, patterns, radius))
}

/// Line-level scan over already loaded content.
pub fn scan_content(path: &Path, content: &str, patterns: &RegexSet, radius: usize) -> Vec<Match> {
    let lines: Vec<&str> = content.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| patterns.is_match(line))
        .map(|(index, line)| Match {
            file: path.to_path_buf(),
            line: index + 1,
            match_line: line.to_string(),
            context: context_window(&lines, index, radius),
        })
        .collect()
}

/// Lines `index - radius ..= index + radius`, clamped to the file.
fn context_window(lines: &[&str], index: usize, radius: usize) -> String {
    let start = index.saturating_sub(radius);
    let end = (index + radius).min(lines.len().saturating_sub(1));

    (start..=end)
        .map(|i| {
            if i == index {
                format!("{}{}", MATCH_MARKER, lines[i])
            } else {
                lines[i].to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_skippable(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::IsADirectory
    )
}
