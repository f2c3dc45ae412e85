use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in [
        "includes",
        "ignores",
        "outDir",
        "marker",
        "registryArgument",
        "extension",
    ] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["marker"], "Register");
    assert_eq!(parsed["registryArgument"], "registerTypeName");

    // 2-space indentation
    assert!(content.contains("\n  \"includes\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "\u{2713} Created .reggenrc.json\n");

    let content = test.read_file(".reggenrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".reggenrc.json", "{}")?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains(".reggenrc.json already exists"));
    assert_eq!(test.read_file(".reggenrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "src/items.ts",
        r#"
@Register("Inventory")
export class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;
    assert_eq!(
        output.code,
        Some(0),
        "Generate should work with initialized config. stderr: {}",
        output.stderr
    );
    assert!(test.root().join("src/generated/Inventory.gen.ts").exists());

    Ok(())
}
