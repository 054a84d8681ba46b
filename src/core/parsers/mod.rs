//! Translation file parsers.
//!
//! Each parser turns one translation file into flat [`TranslationEntry`]
//! values. The format is chosen from the file name:
//! - `strings`: Apple `.strings` files
//! - `android_xml`: Android `strings.xml` resources
//! - `json`: nested JSON catalogs
//! - `yaml`: nested YAML catalogs (Rails i18n style)

pub mod android_xml;
pub mod json;
pub mod strings;
pub mod yaml;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::core::types::TranslationEntry;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported translation file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Unsupported XML format: {} (only Android strings.xml is supported)", .0.display())]
    UnsupportedXml(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed {format} file {}: {message}", path.display())]
    Malformed {
        format: TranslationFormat,
        path: PathBuf,
        message: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(
        format: TranslationFormat,
        path: &Path,
        message: impl ToString,
    ) -> Self {
        ParseError::Malformed {
            format,
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationFormat {
    Strings,
    AndroidXml,
    Json,
    Yaml,
}

impl std::fmt::Display for TranslationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TranslationFormat::Strings => ".strings",
            TranslationFormat::AndroidXml => "Android XML",
            TranslationFormat::Json => "JSON",
            TranslationFormat::Yaml => "YAML",
        };
        f.write_str(name)
    }
}

impl TranslationFormat {
    /// Pick the format from the file name.
    ///
    /// XML is accepted only for Android resources: a file named `strings.xml`
    /// or any XML file under a `res/values*` directory.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("strings") => Ok(TranslationFormat::Strings),
            Some("json") => Ok(TranslationFormat::Json),
            Some("yml" | "yaml") => Ok(TranslationFormat::Yaml),
            Some("xml") if is_android_resource(path) => Ok(TranslationFormat::AndroidXml),
            Some("xml") => Err(ParseError::UnsupportedXml(path.to_path_buf())),
            _ => Err(ParseError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn is_android_resource(path: &Path) -> bool {
    let is_strings_xml = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("strings.xml"));

    is_strings_xml
        || path
            .to_string_lossy()
            .replace('\\', "/")
            .contains("/res/values")
}

/// Parse one translation file into entries, in file order.
pub fn parse_translation_file(path: &Path) -> Result<Vec<TranslationEntry>, ParseError> {
    let format = TranslationFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        TranslationFormat::Strings => {
            let content = strings::decode(&bytes)
                .ok_or_else(|| ParseError::malformed(format, path, "invalid text encoding"))?;
            Ok(strings::parse(&content, path))
        }
        TranslationFormat::AndroidXml => {
            let content = utf8(format, path, bytes)?;
            android_xml::parse(&content, path)
        }
        TranslationFormat::Json => {
            let content = utf8(format, path, bytes)?;
            json::parse(&content, path)
        }
        TranslationFormat::Yaml => {
            let content = utf8(format, path, bytes)?;
            yaml::parse(&content, path)
        }
    }
}

fn utf8(format: TranslationFormat, path: &Path, bytes: Vec<u8>) -> Result<String, ParseError> {
    let content = String::from_utf8(bytes).map_err(|e| ParseError::malformed(format, path, e))?;
    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}
