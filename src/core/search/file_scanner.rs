use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use walkdir::WalkDir;

use super::glob_matcher::IgnoreMatcher;

/// Result of scanning source roots.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidate files in discovery order.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Enumerate files under `roots` whose extension is in `extensions`.
///
/// Roots are walked in the given order with entries sorted by name, so the
/// output order is stable between runs. A file reachable from two roots is
/// listed once, at its first position.
pub fn scan_files(
    roots: &[PathBuf],
    extensions: &[&str],
    ignores: &IgnoreMatcher,
    verbose: bool,
) -> ScanResult {
    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut skipped_count = 0;

    for root in roots {
        if !root.exists() {
            if verbose {
                eprintln!(
                    "{} Source path does not exist: {}",
                    "warning:".bold().yellow(),
                    root.display()
                );
            }
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !ignores.is_ignored(e.path(), root));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, extensions) {
                continue;
            }
            if ignores.is_ignored(path, root) {
                continue;
            }

            let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            if seen.insert(key) {
                files.push(path.to_path_buf());
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::config::Config;

    fn names(result: &ScanResult, root: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_extensions() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("View.swift")).unwrap();
        File::create(dir.path().join("Main.kt")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let result = scan_files(
            &[dir.path().to_path_buf()],
            &["swift"],
            &IgnoreMatcher::default(),
            false,
        );

        assert_eq!(names(&result, dir.path()), vec!["View.swift"]);
    }

    #[test]
    fn test_scan_order_is_stable() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        File::create(dir.path().join("b/Two.swift")).unwrap();
        File::create(dir.path().join("a/One.swift")).unwrap();
        File::create(dir.path().join("Zero.swift")).unwrap();

        let result = scan_files(
            &[dir.path().to_path_buf()],
            &["swift"],
            &IgnoreMatcher::default(),
            false,
        );

        assert_eq!(
            names(&result, dir.path()),
            vec!["Zero.swift", "a/One.swift", "b/Two.swift"]
        );
    }

    #[test]
    fn test_scan_respects_ignores() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Pods/Lib")).unwrap();
        File::create(dir.path().join("Pods/Lib/Lib.swift")).unwrap();
        File::create(dir.path().join("App.swift")).unwrap();

        let ignores = IgnoreMatcher::new(&["**/Pods/**".to_string()]).unwrap();
        let result = scan_files(&[dir.path().to_path_buf()], &["swift"], &ignores, false);

        assert_eq!(names(&result, dir.path()), vec!["App.swift"]);
    }

    #[test]
    fn test_scan_root_under_ignored_folder_name() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("build/MyApp");
        fs::create_dir_all(root.join("Pods/Lib")).unwrap();
        File::create(root.join("View.swift")).unwrap();
        File::create(root.join("Pods/Lib/Lib.swift")).unwrap();

        let ignores = IgnoreMatcher::new(&Config::default().ignore_patterns).unwrap();
        let result = scan_files(std::slice::from_ref(&root), &["swift"], &ignores, false);

        assert_eq!(names(&result, &root), vec!["View.swift"]);
    }

    #[test]
    fn test_scan_dedupes_overlapping_roots() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        File::create(dir.path().join("src/App.kt")).unwrap();

        let roots = vec![dir.path().to_path_buf(), dir.path().join("src")];
        let result = scan_files(&roots, &["kt"], &IgnoreMatcher::default(), false);

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_single_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Only.swift");
        File::create(&file).unwrap();

        let result = scan_files(
            std::slice::from_ref(&file),
            &["swift"],
            &IgnoreMatcher::default(),
            false,
        );

        assert_eq!(result.files, vec![file]);
    }

    #[test]
    fn test_scan_missing_root() {
        let result = scan_files(
            &[PathBuf::from("/definitely/not/here")],
            &["swift"],
            &IgnoreMatcher::default(),
            false,
        );
        assert!(result.files.is_empty());
        assert_eq!(result.skipped_count, 0);
    }
}
