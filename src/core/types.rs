//! Plain records shared by the search engine, the pipeline and the writers.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Description recorded when a key has no usage in the scanned sources.
pub const NO_USAGE_DESCRIPTION: &str = "No usage found in source code";

/// Description recorded when processing an entry failed.
pub const PROCESSING_FAILED_DESCRIPTION: &str = "Processing failed";

/// One localizable key/text pair read from a translation file.
///
/// Keys are not unique across files; duplicates are processed independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationEntry {
    pub key: String,
    pub text: String,
    pub source_file: PathBuf,
    /// Parser-specific extras (`comment`, `array`/`index`, `plural`/`quantity`).
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl TranslationEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>, source_file: &Path) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            source_file: source_file.to_path_buf(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(name.to_string(), value.into());
        self
    }
}

/// A usage location found in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub match_line: String,
    /// Surrounding lines with the matched line prefixed by `>>> `.
    pub context: String,
}

impl Match {
    /// `file:line` form used in result locations.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file.display(), self.line)
    }
}

/// Final record for one translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub key: String,
    pub text: String,
    pub description: String,
    #[serde(default)]
    pub ui_element: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn new(entry: &TranslationEntry, description: impl Into<String>) -> Self {
        Self {
            key: entry.key.clone(),
            text: entry.text.clone(),
            description: description.into(),
            ui_element: None,
            tone: None,
            max_length: None,
            locations: Vec::new(),
            error: None,
        }
    }

    pub fn no_usage(entry: &TranslationEntry) -> Self {
        Self::new(entry, NO_USAGE_DESCRIPTION)
    }

    pub fn failed(entry: &TranslationEntry, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(entry, PROCESSING_FAILED_DESCRIPTION)
        }
    }

    /// True if the description carries something a translator can use.
    ///
    /// Sentinel descriptions and failed results are never written back into files.
    pub fn is_annotatable(&self) -> bool {
        self.error.is_none()
            && !self.description.trim().is_empty()
            && !self.description.contains("No usage found")
            && !self.description.contains(PROCESSING_FAILED_DESCRIPTION)
    }
}
