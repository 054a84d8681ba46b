use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::glob_matcher::IgnoreMatcher;

const IOS_EXTENSIONS: &[&str] = &["swift", "m", "mm", "h"];
const ANDROID_EXTENSIONS: &[&str] = &["kt", "java", "xml"];
const ALL_EXTENSIONS: &[&str] = &["swift", "m", "mm", "h", "kt", "java", "xml"];

/// Mobile platform whose localization call shapes are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    #[default]
    Unknown,
}

impl Platform {
    /// Guess the platform from the configured source roots.
    ///
    /// Roots are checked in order and the first decisive one wins. A directory
    /// with any Swift/Objective-C source is iOS, otherwise any Kotlin/Java
    /// source makes it Android.
    pub fn detect(roots: &[PathBuf], ignores: &IgnoreMatcher) -> Self {
        for root in roots {
            if root.is_file() {
                match extension(root) {
                    Some("swift" | "m" | "mm") => return Platform::Ios,
                    Some("kt" | "java") => return Platform::Android,
                    _ => continue,
                }
            }
            if !root.is_dir() {
                continue;
            }

            let mut has_android = false;
            for entry in WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !ignores.is_ignored(e.path(), root))
                .flatten()
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                match extension(entry.path()) {
                    Some("swift" | "m" | "mm") => return Platform::Ios,
                    Some("kt" | "java") => has_android = true,
                    _ => {}
                }
            }
            if has_android {
                return Platform::Android;
            }
        }
        Platform::Unknown
    }

    /// Source extensions worth scanning on this platform.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Platform::Ios => IOS_EXTENSIONS,
            Platform::Android => ANDROID_EXTENSIONS,
            Platform::Unknown => ALL_EXTENSIONS,
        }
    }

    /// Search patterns for `key`, most idiomatic call shape first.
    ///
    /// Patterns are evaluated per physical line, so a multi-line call is found
    /// through the line holding the key literal.
    pub fn patterns(self, key: &str) -> Vec<String> {
        let escaped = regex::escape(key);
        match self {
            Platform::Ios => ios_patterns(&escaped),
            Platform::Android => android_patterns(&escaped),
            Platform::Unknown => {
                let mut patterns = ios_patterns(&escaped);
                patterns.extend(android_patterns(&escaped));
                patterns.push(escaped);
                patterns
            }
        }
    }

    /// Display label used in prompts and reports.
    pub fn label(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Unknown => "mobile",
        }
    }
}

fn ios_patterns(escaped: &str) -> Vec<String> {
    vec![
        // NSLocalizedString("key", comment: ...) and Objective-C @"key"
        format!(r#"NSLocalizedString\s*\(\s*@?["']{escaped}["']"#),
        // String(localized: "key")
        format!(r#"String\s*\(\s*localized:\s*["']{escaped}["']"#),
        // LocalizedStringKey("key")
        format!(r#"LocalizedStringKey\s*\(\s*["']{escaped}["']"#),
        // Text("key")
        format!(r#"Text\s*\(\s*["']{escaped}["']"#),
        // "key".localized
        format!(r#"["']{escaped}["']\s*\.localized"#),
    ]
}

fn android_patterns(escaped: &str) -> Vec<String> {
    vec![
        format!(r"R\.string\.{escaped}\b"),
        format!(r"@string/{escaped}\b"),
        format!(r"getString\s*\(\s*R\.string\.{escaped}\b"),
        format!(r"\.getString\s*\(\s*R\.string\.{escaped}\b"),
        format!(r"stringResource\s*\(\s*R\.string\.{escaped}\b"),
    ]
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use regex::RegexSet;
    use tempfile::tempdir;

    use super::*;

    fn set(platform: Platform, key: &str) -> RegexSet {
        RegexSet::new(platform.patterns(key)).unwrap()
    }

    #[test]
    fn test_ios_call_shapes() {
        let patterns = set(Platform::Ios, "settings.title");
        assert!(patterns.is_match(r#"let t = NSLocalizedString("settings.title", comment: "")"#));
        assert!(patterns.is_match(r#"NSLocalizedString(@"settings.title", nil)"#));
        assert!(patterns.is_match(r#"String(localized: "settings.title")"#));
        assert!(patterns.is_match(r#"LocalizedStringKey( "settings.title" )"#));
        assert!(patterns.is_match(r#"Text("settings.title")"#));
        assert!(patterns.is_match(r#"label.text = "settings.title".localized"#));
        assert!(!patterns.is_match(r#"print("settings.title")"#));
    }

    #[test]
    fn test_key_is_escaped() {
        let patterns = set(Platform::Ios, "settings.title");
        // `.` must not act as a wildcard
        assert!(!patterns.is_match(r#"Text("settingsXtitle")"#));
    }

    #[test]
    fn test_android_call_shapes() {
        let patterns = set(Platform::Android, "settings_title");
        assert!(patterns.is_match("title = getString(R.string.settings_title)"));
        assert!(patterns.is_match("context.getString( R.string.settings_title )"));
        assert!(patterns.is_match("Text(stringResource(R.string.settings_title))"));
        assert!(patterns.is_match(r#"android:text="@string/settings_title""#));
        assert!(!patterns.is_match("getString(R.string.settings_title_long)"));
    }

    #[test]
    fn test_unknown_includes_bare_key() {
        let ios = Platform::Ios.patterns("a.b").len();
        let android = Platform::Android.patterns("a.b").len();
        let unknown = Platform::Unknown.patterns("a.b");
        assert_eq!(unknown.len(), ios + android + 1);
        assert!(RegexSet::new(&unknown).unwrap().is_match(r#"map["a.b"]"#));
    }

    #[test]
    fn test_detect_ios() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("View.swift"), "").unwrap();
        fs::write(dir.path().join("Main.kt"), "").unwrap();
        let platform = Platform::detect(&[dir.path().to_path_buf()], &IgnoreMatcher::default());
        assert_eq!(platform, Platform::Ios);
    }

    #[test]
    fn test_detect_android() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app/src")).unwrap();
        fs::write(dir.path().join("app/src/Main.kt"), "").unwrap();
        let platform = Platform::detect(&[dir.path().to_path_buf()], &IgnoreMatcher::default());
        assert_eq!(platform, Platform::Android);
    }

    #[test]
    fn test_detect_first_root_wins() {
        let android = tempdir().unwrap();
        fs::write(android.path().join("Main.java"), "").unwrap();
        let ios = tempdir().unwrap();
        fs::write(ios.path().join("View.swift"), "").unwrap();

        let roots = vec![android.path().to_path_buf(), ios.path().to_path_buf()];
        assert_eq!(
            Platform::detect(&roots, &IgnoreMatcher::default()),
            Platform::Android
        );
    }

    #[test]
    fn test_detect_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Legacy.m");
        fs::write(&file, "").unwrap();
        assert_eq!(
            Platform::detect(&[file], &IgnoreMatcher::default()),
            Platform::Ios
        );
    }

    #[test]
    fn test_detect_unknown() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        let roots = vec![dir.path().to_path_buf(), PathBuf::from("/does/not/exist")];
        assert_eq!(
            Platform::detect(&roots, &IgnoreMatcher::default()),
            Platform::Unknown
        );
    }
}
