use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{ContextRequest, ContextResult};
use crate::core::{search::Platform, types::Match};

static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{[^`]+\})\s*```").unwrap());

/// A JSON object with at most one level of nested braces.
static BARE_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap());

pub fn build_prompt(request: &ContextRequest<'_>) -> String {
    let platform = platform_of(request.matches).label();

    format!(
        r#"You are analyzing a localized string from a {platform} mobile app to help translators understand its context.

## Translation Key
`{key}`

## Original Text
"{text}"

## Code Usage
{usages}
## Task
Analyze how this string is used in the mobile app code and provide context for translators.

Focus on:
1. **Where it appears**: What screen or view displays this text?
2. **UI element type**: Is it a button label, navigation title, alert message, placeholder, etc.?
3. **User action**: What action triggers this text or what happens when the user interacts with it?
4. **Constraints**: Are there any length constraints (e.g., button width, navigation bar)?

Write a concise context description (1-2 sentences) that helps a translator understand:
- The purpose of this text in the app
- The UI context where it appears
- Any important considerations for translation

Respond with ONLY a JSON object (no markdown, no explanation):
{{
  "description": "Concise context for translators (1-2 sentences)",
  "ui_element": "button|label|title|alert|toast|placeholder|navigation|menu|tab|error|confirmation|other",
  "tone": "formal|casual|urgent|friendly|technical|neutral",
  "max_length": null or number if there's an apparent character limit
}}
"#,
        key = request.key,
        text = request.text,
        usages = format_matches(request.matches),
    )
}

/// Platform implied by the files the matches came from.
fn platform_of(matches: &[Match]) -> Platform {
    let extensions: Vec<String> = matches
        .iter()
        .filter_map(|m| m.file.extension().and_then(|e| e.to_str()))
        .map(str::to_ascii_lowercase)
        .collect();

    if extensions
        .iter()
        .any(|e| matches!(e.as_str(), "swift" | "m" | "mm"))
    {
        Platform::Ios
    } else if extensions.iter().any(|e| matches!(e.as_str(), "kt" | "java")) {
        Platform::Android
    } else {
        Platform::Unknown
    }
}

fn format_matches(matches: &[Match]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "### Match {}: {}\n```\n{}\n```\n",
                i + 1,
                m.location(),
                m.context
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Interpret the model's reply.
///
/// A fenced or bare JSON object is read leniently. Text without any JSON
/// object becomes the description as-is.
pub fn parse_response(text: &str) -> ContextResult {
    if text.trim().is_empty() {
        return ContextResult::failure("Failed to parse response", "Empty response");
    }

    let Some(json_text) = extract_json(text) else {
        return ContextResult {
            description: text.trim().to_string(),
            ..Default::default()
        };
    };

    let data: Value = match serde_json::from_str(json_text) {
        Ok(data) => data,
        Err(e) => {
            return ContextResult::failure(text.trim(), format!("JSON parse error: {}", e));
        }
    };

    ContextResult {
        description: data
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("No description provided")
            .to_string(),
        ui_element: string_field(&data, "ui_element"),
        tone: string_field(&data, "tone"),
        max_length: data.get("max_length").and_then(max_length),
        error: None,
    }
}

fn extract_json(text: &str) -> Option<&str> {
    if text.contains("```") {
        if let Some(caps) = FENCED_JSON_RE.captures(text) {
            return caps.get(1).map(|m| m.as_str());
        }
    }
    BARE_JSON_RE.find(text).map(|m| m.as_str())
}

fn string_field(data: &Value, name: &str) -> Option<String> {
    data.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts `42`, `42.0` and `"42"`; anything else means no limit.
fn max_length(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
