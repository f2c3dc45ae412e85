use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const ITEMS: &str = r#"
namespace Game.Data {
    export abstract class Item {}

    @Register("Inventory")
    export class Foo extends Item {}

    @Register({ registerTypeName: "Inventory" })
    export class Bar extends Item {}
}
"#;

const INVENTORY_GEN: &str = r#"// <auto-generated> reggen: do not edit by hand.
namespace Game.Data {
    export namespace InventoryHelper {
        export const Type: Map<string, Item> = new Map<string, Item>([
            ["Foo", new Foo()],
            ["Bar", new Bar()],
        ]);
    }
}
"#;

#[test]
fn test_generate_writes_registry() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("created ./src/generated/Inventory.gen.ts"));
    assert!(
        output
            .stdout
            .contains("Generated 1 registry (2 classes) from 1 source file")
    );
    assert_eq!(
        test.read_file("src/generated/Inventory.gen.ts")?,
        INVENTORY_GEN
    );

    Ok(())
}

#[test]
fn test_generate_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;

    run(test.generate_command())?;
    let first = test.read_file("src/generated/Inventory.gen.ts")?;

    // The generated file lives under src/ but must not be picked up as input.
    let output = run(test.generate_command())?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(!output.stdout.contains("created"));
    assert!(!output.stdout.contains("updated"));
    assert_eq!(test.read_file("src/generated/Inventory.gen.ts")?, first);

    Ok(())
}

#[test]
fn test_generate_one_file_per_registry_in_discovery_order() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/a.ts",
        r#"
@Register("Shop")
class Sword extends Weapon {}
@Register(Registries.Inventory)
class Potion extends Consumable {}
"#,
    )?;
    test.write_file(
        "src/b.ts",
        r#"
@Register(registerTypeName = Shop)
class Shield extends Weapon {}
"#,
    )?;

    let output = run(test.generate_command())?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);

    let shop_at = output.stdout.find("Shop.gen.ts").unwrap();
    let inventory_at = output.stdout.find("Inventory.gen.ts").unwrap();
    assert!(shop_at < inventory_at);

    let shop = test.read_file("src/generated/Shop.gen.ts")?;
    assert!(shop.contains("namespace ShopHelper {"));
    assert!(!shop.contains("export namespace"));
    let sword = shop.find("[\"Sword\", new Sword()],").unwrap();
    let shield = shop.find("[\"Shield\", new Shield()],").unwrap();
    assert!(sword < shield);

    let inventory = test.read_file("src/generated/Inventory.gen.ts")?;
    assert!(inventory.contains("Map<string, Consumable>"));

    Ok(())
}

#[test]
fn test_conflicting_base_type_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/a.ts",
        r#"
@Register("Tools")
class Hammer extends Tool {}
@Register("Inventory")
class Foo extends Item {}
"#,
    )?;
    test.write_file(
        "src/b.ts",
        r#"
@Register("Inventory")
class Baz extends Widget {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains(
        "error: `Baz` and `Foo` are both registered into `Inventory` but extend different base types (`Widget` vs `Item`)"
    ));
    assert!(output.stdout.contains("--> ./src/b.ts:3:7"));
    assert!(output.stdout.contains("./src/a.ts:5:7"));
    assert!(output.stdout.contains("no files were written"));
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_invalid_register_argument() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"
@Register(`Inventory`)
class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("invalid-register-argument"));
    assert!(output.stdout.contains("found a template literal"));
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_missing_register_argument() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"
@Register()
class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("missing-register-argument"));

    Ok(())
}

#[test]
fn test_check_reports_stale_then_passes() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;

    let output = run({
        let mut cmd = test.generate_command();
        cmd.arg("--check");
        cmd
    })?;
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("stale ./src/generated/Inventory.gen.ts"));
    assert!(!test.root().join("src/generated").exists());

    run(test.generate_command())?;

    let output = run({
        let mut cmd = test.generate_command();
        cmd.arg("--check");
        cmd
    })?;
    assert_eq!(output.code, Some(0), "stdout: {}", output.stdout);
    assert!(output.stdout.contains("1 generated file is up to date"));

    Ok(())
}

#[test]
fn test_out_dir_override() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;

    let output = run({
        let mut cmd = test.generate_command();
        cmd.args(["--out-dir", "registries"]);
        cmd
    })?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(test.read_file("registries/Inventory.gen.ts")?, INVENTORY_GEN);

    Ok(())
}

#[test]
fn test_source_root() -> Result<()> {
    let test = CliTest::with_file("app/src/items.ts", ITEMS)?;

    let output = run({
        let mut cmd = test.generate_command();
        cmd.args(["--source-root", "app"]);
        cmd
    })?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        test.read_file("app/src/generated/Inventory.gen.ts")?,
        INVENTORY_GEN
    );

    Ok(())
}

#[test]
fn test_config_marker_and_extension() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".reggenrc.json",
        r#"{
         "marker": "Catalog",
         "registryArgument": "catalog",
         "extension": "mts",
         "outDir": "out"
     }"#,
    )?;
    test.write_file(
        "src/items.ts",
        r#"
@Register("Ignored")
class Foo extends Item {}
@CatalogEntry({ catalog: "Parts" })
class Bolt extends Part {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(test.root().join("out/Parts.gen.mts").exists());
    assert!(!test.root().join("out/Ignored.gen.mts").exists());

    Ok(())
}

#[test]
fn test_test_files_are_ignored() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;
    test.write_file(
        "src/items.test.ts",
        r#"
@Register("Inventory")
class Mock extends Widget {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(0), "stdout: {}", output.stdout);
    assert_eq!(
        test.read_file("src/generated/Inventory.gen.ts")?,
        INVENTORY_GEN
    );

    Ok(())
}

#[test]
fn test_no_registered_classes() -> Result<()> {
    let test = CliTest::with_file("src/plain.ts", "export class Plain {}")?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        "\u{2713} Scanned 1 source file - no registered classes found\n"
    );
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_parse_error_exits_with_error() -> Result<()> {
    let test = CliTest::with_file("src/broken.ts", "class {")?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.starts_with("Error: Failed to parse file: ./src/broken.ts"));

    Ok(())
}

#[test]
fn test_invalid_config_exits_with_error() -> Result<()> {
    let test = CliTest::with_file(".reggenrc.json", r#"{ "marker": "" }"#)?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("'marker' must not be empty"));

    Ok(())
}

#[test]
fn test_verbose_prints_config_note() -> Result<()> {
    let test = CliTest::with_file("src/items.ts", ITEMS)?;

    let output = run({
        let mut cmd = test.generate_command();
        cmd.arg("-v");
        cmd
    })?;

    assert_eq!(output.code, Some(0));
    assert!(output.stderr.contains("No .reggenrc.json found"));
    // Timing is disabled by the test environment.
    assert!(!output.stderr.contains("Finished"));

    Ok(())
}

#[test]
fn test_path_like_registry_name_writes_nothing() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"
@Register("../../escaped")
class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("invalid-registry-name"));
    assert!(
        output
            .stdout
            .contains("registry name `../../escaped` of `Foo` is not a valid identifier")
    );
    assert!(!test.root().join("escaped.gen.ts").exists());
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_module_classes_are_imported() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/models/item.ts", "export abstract class Item {}\n")?;
    test.write_file(
        "src/items/foo.ts",
        r#"import { Item } from "../models/item";

@Register("Inventory")
export class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        test.read_file("src/generated/Inventory.gen.ts")?,
        r#"// <auto-generated> reggen: do not edit by hand.
import { Foo } from "../items/foo";
import { Item } from "../models/item";

export namespace InventoryHelper {
    export const Type: Map<string, Item> = new Map<string, Item>([
        ["Foo", new Foo()],
    ]);
}
"#
    );

    Ok(())
}

#[test]
fn test_unexported_module_class_writes_nothing() -> Result<()> {
    let test = CliTest::with_file(
        "src/items.ts",
        r#"import { Item } from "./item";

@Register("Inventory")
class Foo extends Item {}
"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("unexported-registered-type"));
    assert!(output.stdout.contains("--> ./src/items.ts:4:7"));
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}
