use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_list_groups_in_discovery_order() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"
namespace Game.Data {
    @Register("Inventory")
    export class Foo extends Item {}

    @Register("Shop")
    export class Sword extends Weapon {}

    @Register("Inventory")
    export class Bar extends Item {}
}
"#,
    )?;

    let output = run(test.list_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        output.stdout,
        "\
Inventory -> Game.Data.InventoryHelper (base: Item)
  Foo  ./src/items.ts:4:18
  Bar  ./src/items.ts:10:18
Shop -> Game.Data.ShopHelper (base: Weapon)
  Sword  ./src/items.ts:7:18

\u{2713} Found 2 registries (3 classes) in 1 source file
"
    );
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_list_reports_conflicts() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"
@Register("Inventory")
class Foo extends Item {}
@Register("Inventory")
class Baz extends Widget {}
"#,
    )?;

    let output = run(test.list_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("conflicting-base-type"));

    Ok(())
}

#[test]
fn test_list_empty_project() -> Result<()> {
    let test = CliTest::new()?;

    let output = run(test.list_command())?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Scanned 0 source files"));

    Ok(())
}
