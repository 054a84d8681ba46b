/// Comma-separated key patterns from `--keys`.
///
/// `*` matches zero or more characters anywhere in the key, including `.`.
/// Every other character is literal and the whole key must match.
///
/// Examples:
/// - `settings.*` matches `settings.title` and `settings.privacy.header`
/// - `*_title` matches `settings_title` but not `settings_title_long`
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    patterns: Vec<String>,
}

impl KeyFilter {
    pub fn parse(spec: &str) -> Self {
        let patterns = spec
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// An empty filter matches every key.
    pub fn matches(&self, key: &str) -> bool {
        self.is_empty() || self.patterns.iter().any(|p| wildcard_matches(p, key))
    }
}

/// Match `text` against a pattern where `*` matches 0 or more characters.
pub fn wildcard_matches(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if !pattern.contains('*') {
        return pattern == text;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let first = parts[0];
    let last = parts[parts.len() - 1];

    // First part must be a prefix, last part a suffix, without overlap
    if !text.starts_with(first) || !text.ends_with(last) {
        return false;
    }
    if first.len() + last.len() > text.len() {
        return false;
    }

    let mut pos = first.len();
    let end = text.len() - last.len();

    // Middle parts must appear in order
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match text[pos..end].find(part) {
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }

    true
}
