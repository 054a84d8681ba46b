use std::{
    process::{Command, Stdio},
    thread,
    time::Duration,
};

use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, FakeLlm, llm_reply};

const STRINGS: &str = r#"/* Screen header */
"home.title" = "Home";
"settings.save" = "Save";
"unused.key" = "Never shown";
"#;

const SWIFT: &str = r#"import SwiftUI

struct HomeView: View {
    var body: some View {
        Text("home.title")
        Button(NSLocalizedString("settings.save", comment: "")) {}
    }
}
"#;

fn ios_project() -> Result<CliTest> {
    let test = CliTest::with_file("en.lproj/Localizable.strings", STRINGS)?;
    test.write_file("Sources/HomeView.swift", SWIFT)?;
    Ok(test)
}

#[test]
fn test_dry_run_lists_keys() -> Result<()> {
    let test = ios_project()?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "--dry-run"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "Dry run: would process 3 keys:\n  - home.title: Home\n  - settings.save: Save\n  - unused.key: Never shown\n"
    );
    Ok(())
}

#[test]
fn test_dry_run_with_key_filter() -> Result<()> {
    let test = ios_project()?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "-k", "home.*, settings.*", "--dry-run"])
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("Dry run: would process 2 keys:"));
    assert!(!stdout.contains("unused.key"));
    Ok(())
}

#[test]
fn test_no_matching_keys_exits_zero() -> Result<()> {
    let test = ios_project()?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "-k", "missing.*"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout)?, "No translation entries found.\n");
    Ok(())
}

#[test]
fn test_missing_translations_argument() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("No translation files given"));
    Ok(())
}

#[test]
fn test_missing_translation_file_is_warned_and_skipped() -> Result<()> {
    let test = ios_project()?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings,de.lproj/Missing.strings", "--dry-run"])
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("warning: Translation file not found: de.lproj/Missing.strings"));
    assert!(String::from_utf8(output.stdout)?.contains("3 keys"));
    Ok(())
}

#[test]
fn test_missing_api_key() -> Result<()> {
    let test = ios_project()?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "--no-cache"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("ANTHROPIC_API_KEY"));
    assert!(!test.root().join("translation-context.csv").exists());
    Ok(())
}

#[test]
fn test_config_file_is_used() -> Result<()> {
    let test = ios_project()?;
    test.write_file(
        ".txcontextrc.json",
        r#"{ "translations": ["en.lproj/Localizable.strings"], "sourcePaths": ["Sources"] }"#,
    )?;

    let output = test.extract_command().arg("--dry-run").output()?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("3 keys"));
    Ok(())
}

#[test]
fn test_invalid_config_value() -> Result<()> {
    let test = ios_project()?;
    test.write_file(
        ".txcontextrc.json",
        r#"{ "translations": ["en.lproj/Localizable.strings"], "concurrency": 0 }"#,
    )?;

    let output = test.extract_command().arg("--dry-run").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("concurrency"));
    Ok(())
}

#[test]
fn test_extract_end_to_end_with_write_back() -> Result<()> {
    let test = ios_project()?;
    let llm = FakeLlm::start(|_| (200, llm_reply("Shown on the home screen")))?;

    let output = test
        .extract_command()
        .args([
            "-t",
            "en.lproj/Localizable.strings",
            "-s",
            "Sources",
            "--no-cache",
            "--write-back",
            "--write-back-to-code",
        ])
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(llm.requests(), 2);

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Processed 3 keys: 2 described, 0 cached, 1 without usage"));
    assert!(stdout.contains("Updated 1 translation file with context comments"));
    assert!(stdout.contains("Updated 1 Swift file with context comments"));

    let csv = test.read_file("translation-context.csv")?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "key,text,description,ui_element,tone,max_length,locations,error"
    );
    assert_eq!(
        lines[1],
        "home.title,Home,Shown on the home screen,label,neutral,,Sources/HomeView.swift:5,"
    );
    assert!(lines[2].starts_with("settings.save,Save,Shown on the home screen,"));
    assert_eq!(lines[3], "unused.key,Never shown,No usage found in source code,,,,,");

    assert_eq!(
        test.read_file("en.lproj/Localizable.strings")?,
        r#"/* Context: Shown on the home screen */
"home.title" = "Home";
/* Context: Shown on the home screen */
"settings.save" = "Save";
"unused.key" = "Never shown";
"#
    );
    assert!(
        test.read_file("Sources/HomeView.swift")?
            .contains(r#"NSLocalizedString("settings.save", comment: "Context: Shown on the home screen")"#)
    );
    Ok(())
}

#[test]
fn test_extract_reports_failed_keys() -> Result<()> {
    let test = ios_project()?;
    let llm = FakeLlm::start(|body| {
        if body.contains("`settings.save`") {
            (401, r#"{"type":"error"}"#.to_string())
        } else {
            (200, llm_reply("Header of the home screen"))
        }
    })?;

    let output = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "-s", "Sources", "--no-cache", "-f", "json", "-o", "out/context.json"])
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    llm.requests();
    assert!(String::from_utf8(output.stdout)?.contains("1 key failed"));

    let doc: serde_json::Value = serde_json::from_str(&test.read_file("out/context.json")?)?;
    assert_eq!(doc["total"], 3);
    let entries = doc["entries"].as_array().expect("entries array");
    let keys: Vec<&str> = entries.iter().filter_map(|e| e["key"].as_str()).collect();
    assert_eq!(keys, vec!["home.title", "settings.save", "unused.key"]);
    assert_eq!(entries[0]["context"]["description"], "Header of the home screen");
    assert_eq!(entries[1]["context"]["description"], "Authentication failed");
    assert_eq!(entries[1]["error"], "Invalid API key");
    assert!(entries[2]["error"].is_null());
    Ok(())
}

#[test]
fn test_cache_is_reused() -> Result<()> {
    let test = ios_project()?;
    let args = ["-t", "en.lproj/Localizable.strings", "-s", "Sources"];

    let llm = FakeLlm::start(|_| (200, llm_reply("Cached description")))?;
    let first = test
        .extract_command()
        .args(args)
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;
    assert!(first.status.success());
    assert_eq!(llm.requests(), 2);
    assert!(test.root().join(".txcontext-cache").is_dir());

    let llm = FakeLlm::start(|_| (500, "{}".to_string()))?;
    let second = test
        .extract_command()
        .args(args)
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;
    assert!(second.status.success());
    assert_eq!(llm.requests(), 0);
    assert!(String::from_utf8(second.stdout)?.contains("0 described, 3 cached"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_130() -> Result<()> {
    let test = ios_project()?;
    let llm = FakeLlm::start(|_| {
        thread::sleep(Duration::from_secs(3));
        (200, llm_reply("Too late"))
    })?;

    let child = test
        .extract_command()
        .args(["-t", "en.lproj/Localizable.strings", "-s", "Sources", "--no-cache"])
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    thread::sleep(Duration::from_millis(1000));
    let kill = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()?;
    assert!(kill.success());

    let output = child.wait_with_output()?;
    assert_eq!(output.status.code(), Some(130));
    assert!(String::from_utf8(output.stderr)?.contains("Interrupted"));
    assert!(!test.root().join("translation-context.csv").exists());
    Ok(())
}

#[test]
fn test_clear_cache_forces_fresh_results() -> Result<()> {
    let test = ios_project()?;
    let args = ["-t", "en.lproj/Localizable.strings", "-s", "Sources"];

    let llm = FakeLlm::start(|_| (200, llm_reply("First description")))?;
    let first = test
        .extract_command()
        .args(args)
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;
    assert!(first.status.success());
    assert_eq!(llm.requests(), 2);

    let llm = FakeLlm::start(|_| (200, llm_reply("Second description")))?;
    let second = test
        .extract_command()
        .args(args)
        .arg("--clear-cache")
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", &llm.url)
        .output()?;
    assert!(second.status.success());
    assert_eq!(llm.requests(), 2);
    assert!(String::from_utf8(second.stdout)?.contains("2 described, 0 cached"));
    assert!(test.read_file("translation-context.csv")?.contains("Second description"));
    Ok(())
}
