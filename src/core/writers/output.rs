//! CSV and JSON result files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::core::types::ExtractionResult;

const CSV_HEADER: [&str; 8] = [
    "key",
    "text",
    "description",
    "ui_element",
    "tone",
    "max_length",
    "locations",
    "error",
];

const LOCATION_SEPARATOR: &str = ";";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Write `results` to `path`, sorted by key.
pub fn write_results(results: &[ExtractionResult], path: &Path, format: OutputFormat) -> Result<()> {
    let mut sorted: Vec<&ExtractionResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let content = match format {
        OutputFormat::Csv => render_csv(&sorted)?,
        OutputFormat::Json => render_json(&sorted)?,
    };
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn render_csv(results: &[&ExtractionResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for result in results {
        let max_length = result.max_length.map(|n| n.to_string()).unwrap_or_default();
        let locations = result.locations.join(LOCATION_SEPARATOR);
        writer.write_record([
            result.key.as_str(),
            result.text.as_str(),
            result.description.as_str(),
            result.ui_element.as_deref().unwrap_or_default(),
            result.tone.as_deref().unwrap_or_default(),
            max_length.as_str(),
            locations.as_str(),
            result.error.as_deref().unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn render_json(results: &[&ExtractionResult]) -> Result<String> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format timestamp")?;

    let entries: Vec<_> = results
        .iter()
        .map(|r| {
            json!({
                "key": r.key,
                "text": r.text,
                "context": {
                    "description": r.description,
                    "ui_element": r.ui_element,
                    "tone": r.tone,
                    "max_length": r.max_length,
                },
                "locations": r.locations,
                "error": r.error,
            })
        })
        .collect();

    let document = json!({
        "generated_at": generated_at,
        "version": env!("CARGO_PKG_VERSION"),
        "total": entries.len(),
        "entries": entries,
    });

    let mut content = serde_json::to_string_pretty(&document)?;
    content.push('\n');
    Ok(content)
}
