//! Result consumers: output files and in-place comment write-back.
//!
//! Write-back engines share one contract. They only touch the comment
//! attached to a recognized entry, skip results that carry no translator
//! value, and produce byte-identical output when run again on their own
//! output.

pub mod android_xml;
pub mod comment_policy;
pub mod output;
pub mod strings;
pub mod swift;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use enum_dispatch::enum_dispatch;

pub use android_xml::AndroidXmlWriter;
pub use comment_policy::{CommentMode, CommentPolicy, DEFAULT_CONTEXT_PREFIX};
pub use output::{OutputFormat, write_results};
pub use strings::StringsWriter;
pub use swift::SwiftWriter;

use crate::core::{parsers::TranslationFormat, types::ExtractionResult};

/// Annotatable results indexed by key. A later duplicate key wins.
pub type ResultsByKey<'a> = HashMap<&'a str, &'a ExtractionResult>;

pub fn results_by_key(results: &[ExtractionResult]) -> ResultsByKey<'_> {
    results
        .iter()
        .filter(|r| r.is_annotatable())
        .map(|r| (r.key.as_str(), r))
        .collect()
}

#[enum_dispatch]
pub trait CommentWriter {
    /// Rewrite `content` with context comments for `results`.
    fn update_content(&self, content: &str, results: &ResultsByKey<'_>) -> Result<String>;
}

#[enum_dispatch(CommentWriter)]
#[derive(Debug, Clone)]
pub enum WriteBackTarget {
    Strings(StringsWriter),
    AndroidXml(AndroidXmlWriter),
    Swift(SwiftWriter),
}

impl WriteBackTarget {
    /// Writer for a translation file, if its format carries comments.
    pub fn for_translation_file(path: &Path, policy: &CommentPolicy) -> Option<Self> {
        match TranslationFormat::from_path(path).ok()? {
            TranslationFormat::Strings => Some(StringsWriter::new(policy.clone()).into()),
            TranslationFormat::AndroidXml => Some(AndroidXmlWriter::new(policy.clone()).into()),
            TranslationFormat::Json | TranslationFormat::Yaml => None,
        }
    }

    /// Update one file in place. Returns whether it changed.
    pub fn update_file(&self, path: &Path, results: &ResultsByKey<'_>) -> Result<bool> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let updated = self
            .update_content(&content, results)
            .with_context(|| format!("Failed to update {}", path.display()))?;

        if updated == content {
            return Ok(false);
        }
        fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }
}

/// Statistics from a write-back pass.
#[derive(Debug, Clone, Default)]
pub struct WriteBackStats {
    /// Files examined.
    pub processed: usize,
    /// Files without a write-back format.
    pub skipped: usize,
    /// Files rewritten.
    pub files_modified: usize,
    pub modified_paths: Vec<PathBuf>,
}

impl WriteBackStats {
    pub fn record(&mut self, path: &Path, changed: bool) {
        self.processed += 1;
        if changed {
            self.files_modified += 1;
            self.modified_paths.push(path.to_path_buf());
        }
    }
}

/// Line ending of `line`, `"\n"` when it has none.
pub(crate) fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::core::types::TranslationEntry;

    fn result(key: &str, description: &str) -> ExtractionResult {
        let entry = TranslationEntry::new(key, "Text", Path::new("en.strings"));
        ExtractionResult::new(&entry, description)
    }

    #[test]
    fn test_results_by_key_skips_sentinels() {
        let entry = TranslationEntry::new("b", "B", Path::new("en.strings"));
        let results = vec![
            result("a", "Title of the home screen"),
            ExtractionResult::no_usage(&entry),
            ExtractionResult::failed(&TranslationEntry::new("c", "C", Path::new("x")), "boom"),
        ];
        let by_key = results_by_key(&results);
        assert_eq!(by_key.len(), 1);
        assert!(by_key.contains_key("a"));
    }

    #[test]
    fn test_target_for_translation_file() {
        let policy = CommentPolicy::default();
        assert!(matches!(
            WriteBackTarget::for_translation_file(Path::new("en.lproj/Localizable.strings"), &policy),
            Some(WriteBackTarget::Strings(_))
        ));
        assert!(matches!(
            WriteBackTarget::for_translation_file(Path::new("res/values/strings.xml"), &policy),
            Some(WriteBackTarget::AndroidXml(_))
        ));
        assert!(WriteBackTarget::for_translation_file(Path::new("en.json"), &policy).is_none());
        assert!(WriteBackTarget::for_translation_file(Path::new("notes.txt"), &policy).is_none());
    }

    #[test]
    fn test_update_file_writes_only_on_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Localizable.strings");
        fs::write(&path, "\"a\" = \"A\";\n").unwrap();

        let results = vec![result("a", "Home title")];
        let by_key = results_by_key(&results);
        let target = WriteBackTarget::from(StringsWriter::new(CommentPolicy::default()));

        assert!(target.update_file(&path, &by_key).unwrap());
        let first = fs::read_to_string(&path).unwrap();
        assert!(!target.update_file(&path, &by_key).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }
}
