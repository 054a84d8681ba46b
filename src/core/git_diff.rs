//! Translation keys added or changed since a git base ref.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    process::Command,
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::types::TranslationEntry;

static STRINGS_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\+\s*"([^"]+)"\s*="#).unwrap());

static XML_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:string|string-array|plurals)\s+name=["']([^"']+)["']"#).unwrap()
});

pub struct GitDiff {
    base_ref: String,
    /// Directory `git` runs in; the process working directory when `None`.
    repo_dir: Option<PathBuf>,
}

impl GitDiff {
    pub fn new(base_ref: impl Into<String>) -> Self {
        Self {
            base_ref: base_ref.into(),
            repo_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    pub fn base_ref(&self) -> &str {
        &self.base_ref
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// True when running inside a git work tree.
    pub fn is_available(&self) -> bool {
        self.git()
            .args(["rev-parse", "--git-dir"])
            .output()
            .is_ok_and(|o| o.status.success())
    }

    pub fn base_ref_exists(&self) -> bool {
        self.git()
            .args(["rev-parse", "--verify", "--quiet", &self.base_ref])
            .output()
            .is_ok_and(|o| o.status.success())
    }

    /// Keys on added lines of `base...HEAD` for each existing translation file.
    ///
    /// Android arrays and plurals are reported by their element name.
    pub fn changed_keys(&self, paths: &[PathBuf]) -> Result<HashSet<String>> {
        let mut keys = HashSet::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let diff = self.diff_for_file(path)?;
            if diff.is_empty() {
                continue;
            }
            keys.extend(extract_keys(&diff, path));
        }

        Ok(keys)
    }

    fn diff_for_file(&self, path: &Path) -> Result<String> {
        let range = format!("{}...HEAD", self.base_ref);
        let output = self
            .git()
            .arg("diff")
            .arg(&range)
            .arg("--")
            .arg(path)
            .output()
            .context("Failed to run git diff")?;

        // A failing diff (unknown path, unrelated history) contributes nothing
        if !output.status.success() {
            return Ok(String::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Added keys found in one file's diff.
pub fn extract_keys(diff: &str, path: &Path) -> HashSet<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let added = diff
        .lines()
        .filter(|line| line.starts_with('+') && !line.starts_with("++"));

    match ext.as_deref() {
        Some("strings") => added
            .filter_map(|line| STRINGS_KEY_RE.captures(line))
            .map(|caps| caps[1].to_string())
            .collect(),
        Some("xml") => added
            .flat_map(|line| XML_KEY_RE.captures_iter(line))
            .map(|caps| caps[1].to_string())
            .collect(),
        _ => HashSet::new(),
    }
}

/// Whether `entry` belongs to a changed key, directly or through its array or plural.
pub fn entry_changed(entry: &TranslationEntry, changed: &HashSet<String>) -> bool {
    changed.contains(&entry.key)
        || ["array", "plural"].iter().any(|field| {
            entry
                .metadata
                .get(*field)
                .and_then(|v| v.as_str())
                .is_some_and(|name| changed.contains(name))
        })
}
