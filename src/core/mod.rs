//! Core generation engine.
//!
//! A generation pass runs in three phases:
//!
//! 1. **Extraction**: each parsed file is lowered into [`ClassDeclaration`]s
//!    (`extract`), files in sorted path order, declarations in source order.
//! 2. **Collection**: one fold over all declarations groups registered classes
//!    by registry name and validates each group (`collect`).
//! 3. **Emission**: every group is rendered into a generated unit (`emit`) and
//!    handed to an output sink (`sink`).
//!
//! Collection failures abort the pass before anything is emitted.
//!
//! ## Module Structure
//!
//! - `collect`: Registry grouping and validation
//! - `context`: Config loading, file scanning and parsing for one pass
//! - `emit`: TypeScript rendering of registry groups
//! - `error`: Errors that abort a pass
//! - `extract`: swc AST → declaration model
//! - `file_scanner`: Source file discovery
//! - `parsers`: swc parser setup
//! - `sink`: Destinations for generated units
//! - `syntax`: Declaration model

pub mod collect;
pub mod context;
pub mod emit;
pub mod error;
pub mod extract;
pub mod file_scanner;
pub mod parsers;
pub mod sink;
pub mod syntax;

pub use collect::{CollectOptions, RegisterMatch, RegistryGroup, RegistryGroups};
pub use context::GenerateContext;
pub use emit::{EmitOptions, GeneratedUnit};
pub use error::RegisterError;
pub use syntax::{ClassDeclaration, SourceContext, SourceLocation};

/// Output of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub groups: RegistryGroups,
    pub units: Vec<GeneratedUnit>,
}

/// Collect and emit in one go. Nothing is rendered if collection fails.
pub fn generate<'a, I>(
    declarations: I,
    collect_options: &CollectOptions,
    emit_options: &EmitOptions,
) -> Result<Generation, RegisterError>
where
    I: IntoIterator<Item = &'a ClassDeclaration>,
{
    let groups = collect::collect_registries(declarations, collect_options)?;
    let units = emit::emit_registries(&groups, emit_options);
    Ok(Generation { groups, units })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use swc_common::SourceMap;

    use super::*;
    use crate::core::{
        extract::extract_declarations,
        parsers::ts::parse_ts_source,
        sink::{MemorySink, write_all},
    };

    fn declarations(files: &[(&str, &str)]) -> Vec<ClassDeclaration> {
        files
            .iter()
            .flat_map(|(path, code)| {
                let parsed =
                    parse_ts_source(code.to_string(), path, Arc::new(SourceMap::default()))
                        .unwrap();
                extract_declarations(&parsed)
            })
            .collect()
    }

    #[test]
    fn test_generate_into_memory() {
        let declarations = declarations(&[
            (
                "src/weapons.ts",
                "namespace Game { @Register(\"Armory\") export class Sword extends Weapon {} }",
            ),
            (
                "src/items.ts",
                "namespace Game { @Register(\"Inventory\") export class Potion extends Item {} }",
            ),
        ]);

        let generation = generate(
            &declarations,
            &CollectOptions::default(),
            &EmitOptions::default(),
        )
        .unwrap();
        let mut sink = MemorySink::default();
        write_all(&mut sink, &generation.units).unwrap();

        let files: Vec<&str> = sink.units.iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(files, vec!["Armory.gen.ts", "Inventory.gen.ts"]);
        assert!(sink.units[1].contents.contains("[\"Potion\", new Potion()],"));
    }

    #[test]
    fn test_failed_collection_emits_nothing() {
        let declarations = declarations(&[(
            "src/items.ts",
            "@Register(\"Inventory\") class Foo extends Item {}\n@Register(\"../escaped\") class Bar extends Item {}",
        )]);

        let err = generate(
            &declarations,
            &CollectOptions::default(),
            &EmitOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RegisterError::InvalidRegistryName { .. }));
    }
}
