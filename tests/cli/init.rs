use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in [
        "translations",
        "sourcePaths",
        "ignorePatterns",
        "concurrency",
        "contextLines",
        "maxMatchesPerKey",
        "provider",
        "output",
        "format",
        "swiftFunctions",
        "contextPrefix",
        "contextMode",
    ] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["concurrency"], 5);
    assert_eq!(parsed["contextMode"], "replace");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Created"));
    assert!(test.root().join(".txcontextrc.json").exists());

    let content = test.read_file(".txcontextrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".txcontextrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("--force"));
    assert_eq!(test.read_file(".txcontextrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_force_overwrites() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".txcontextrc.json", "{}")?;

    let output = test.command().args(["init", "--force"]).output()?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Overwrote"));
    assert_config_content(&test.read_file(".txcontextrc.json")?)?;

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "ios/MyApp/Resources/en.lproj/Localizable.strings",
        "\"welcome.title\" = \"Welcome\";\n",
    )?;

    let output = test.extract_command().arg("--dry-run").output()?;
    assert!(
        output.status.success(),
        "Extract should work with the initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8(output.stdout)?.contains("welcome.title: Welcome"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("extract"));

    Ok(())
}
