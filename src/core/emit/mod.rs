//! Code generation for registry groups.
//!
//! Each non-empty [`RegistryGroup`] becomes one TypeScript file declaring a
//! `<Registry>Helper` namespace inside the group's namespace. The helper holds a
//! single `Type` map from class name to a default-constructed instance, typed
//! by the group's canonical base type. Entries follow discovery order.
//!
//! Groups with a member declared in an ES module are rendered as a module
//! instead: the classes and the base type are imported relative to the output
//! directory and the helper namespace is exported at the top level.
//!
//! Rendering is a pure function of the groups, so the same input always
//! produces byte-identical output.

use std::{
    fmt::Write,
    path::{Component, Path, PathBuf},
};

use indexmap::IndexMap;

use crate::core::{
    collect::{RegisterMatch, RegistryGroup, RegistryGroups},
    syntax::{ImportSource, ImportedName},
};

/// Extension used for generated files unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "ts";

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// <auto-generated> reggen: do not edit by hand.";

/// Value type used when the canonical member declares no base type.
pub const UNTYPED_BASE: &str = "unknown";

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub extension: String,
    /// Directory the units are written to. Imports of module-declared classes
    /// are relative to it.
    pub out_dir: PathBuf,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            out_dir: PathBuf::from("."),
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub registry_name: String,
    /// `<registry>.gen.<ext>`
    pub file_name: String,
    pub contents: String,
}

pub fn generated_file_name(registry_name: &str, extension: &str) -> String {
    format!("{}.gen.{}", registry_name, extension)
}

/// Name of the helper namespace generated for a registry.
pub fn helper_name(registry_name: &str) -> String {
    format!("{}Helper", registry_name)
}

/// Render every non-empty group, in group order.
pub fn emit_registries(groups: &RegistryGroups, options: &EmitOptions) -> Vec<GeneratedUnit> {
    groups
        .iter()
        .filter_map(|(registry_name, group)| emit_group(registry_name, group, options))
        .collect()
}

/// Render one group. Returns `None` for an empty group.
pub fn emit_group(
    registry_name: &str,
    group: &RegistryGroup,
    options: &EmitOptions,
) -> Option<GeneratedUnit> {
    let canonical = group.canonical()?;

    Some(GeneratedUnit {
        registry_name: registry_name.to_string(),
        file_name: generated_file_name(registry_name, &options.extension),
        contents: render(registry_name, canonical, group.members(), options),
    })
}

fn render(
    registry_name: &str,
    canonical: &RegisterMatch,
    members: &[RegisterMatch],
    options: &EmitOptions,
) -> String {
    let base_type = if canonical.base_type_name.is_empty() {
        UNTYPED_BASE
    } else {
        canonical.base_type_name.as_str()
    };

    if members.iter().any(|member| member.module.is_some()) {
        return render_module(registry_name, base_type, canonical, members, options);
    }

    let in_namespace = !canonical.namespace.is_empty();
    let outer = if in_namespace { INDENT } else { "" };

    let mut out = String::new();
    let _ = writeln!(out, "{}", GENERATED_HEADER);
    if in_namespace {
        let _ = writeln!(out, "namespace {} {{", canonical.namespace);
    }

    let _ = writeln!(
        out,
        "{}{}namespace {} {{",
        outer,
        if in_namespace { "export " } else { "" },
        helper_name(registry_name)
    );
    let names: Vec<&str> = members.iter().map(|m| m.self_type_name.as_str()).collect();
    write_type_map(&mut out, outer, base_type, members, &names);
    let _ = writeln!(out, "{outer}}}");

    if in_namespace {
        let _ = writeln!(out, "}}");
    }
    out
}

/// Generated file for a group with at least one member declared in an ES
/// module. The file is a module itself: it imports every module member and
/// the canonical base type, and exports the helper at the top level. Script
/// members stay global and are referenced by their qualified name.
fn render_module(
    registry_name: &str,
    base_type: &str,
    canonical: &RegisterMatch,
    members: &[RegisterMatch],
    options: &EmitOptions,
) -> String {
    let mut imports = ImportTable::default();
    let mut names = Vec::with_capacity(members.len());

    for member in members {
        match member.module.as_ref().and_then(|origin| origin.export.as_ref()) {
            Some(export) => {
                let target = Path::new(&member.context.location.file_path);
                imports.add(
                    relative_specifier(&options.out_dir, target),
                    &member.self_type_name,
                    &ImportedName::from(export.clone()),
                );
                names.push(member.self_type_name.clone());
            }
            None if member.namespace.is_empty() => names.push(member.self_type_name.clone()),
            None => names.push(format!("{}.{}", member.namespace, member.self_type_name)),
        }
    }

    if let Some(base_import) = canonical
        .module
        .as_ref()
        .and_then(|origin| origin.base_import.as_ref())
    {
        let specifier = match &base_import.source {
            ImportSource::File(path) => relative_specifier(&options.out_dir, Path::new(path)),
            ImportSource::Package(name) => name.clone(),
        };
        imports.add(specifier, &base_import.local, &base_import.imported);
    }

    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", GENERATED_HEADER);
    imports.write(&mut out);
    let _ = writeln!(out);
    let _ = writeln!(out, "export namespace {} {{", helper_name(registry_name));
    write_type_map(&mut out, "", base_type, members, &names);
    let _ = writeln!(out, "}}");
    out
}

/// The `Type` map. `names[i]` is how `members[i]` is referenced from the file.
fn write_type_map(
    out: &mut String,
    outer: &str,
    base_type: &str,
    members: &[RegisterMatch],
    names: &[&str],
) {
    let _ = writeln!(
        out,
        "{outer}{INDENT}export const Type: Map<string, {base}> = new Map<string, {base}>([",
        base = base_type
    );
    for (member, name) in members.iter().zip(names) {
        let _ = writeln!(
            out,
            "{outer}{INDENT}{INDENT}[\"{key}\", new {name}()],",
            key = member.self_type_name
        );
    }
    let _ = writeln!(out, "{outer}{INDENT}]);");
}

/// Import bindings grouped by module specifier, in first-seen order.
#[derive(Default)]
struct ImportTable {
    modules: IndexMap<String, ModuleImports>,
}

#[derive(Default)]
struct ModuleImports {
    default: Option<String>,
    namespace: Option<String>,
    /// `Foo` or `Bar as Foo`.
    named: Vec<String>,
}

impl ImportTable {
    fn add(&mut self, specifier: String, local: &str, imported: &ImportedName) {
        let entry = self.modules.entry(specifier).or_default();
        match imported {
            ImportedName::Default => {
                entry.default.get_or_insert_with(|| local.to_string());
            }
            ImportedName::Namespace => {
                entry.namespace.get_or_insert_with(|| local.to_string());
            }
            ImportedName::Named(name) => {
                let binding = if name == local {
                    local.to_string()
                } else {
                    format!("{} as {}", name, local)
                };
                if !entry.named.contains(&binding) {
                    entry.named.push(binding);
                }
            }
        }
    }

    fn write(&self, out: &mut String) {
        for (specifier, imports) in &self.modules {
            if let Some(local) = &imports.default {
                let _ = writeln!(out, "import {} from \"{}\";", local, specifier);
            }
            if let Some(local) = &imports.namespace {
                let _ = writeln!(out, "import * as {} from \"{}\";", local, specifier);
            }
            if !imports.named.is_empty() {
                let _ = writeln!(
                    out,
                    "import {{ {} }} from \"{}\";",
                    imports.named.join(", "),
                    specifier
                );
            }
        }
    }
}

/// Module specifier that reaches `target` from a file in `out_dir`.
///
/// Paths are compared lexically after normalization; mixing an absolute and a
/// relative path resolves both against the working directory first. TypeScript
/// source extensions are dropped or mapped to their emitted JavaScript form.
pub fn relative_specifier(out_dir: &Path, target: &Path) -> String {
    let (from, to) = if out_dir.is_absolute() == target.is_absolute() {
        (normalize(out_dir), normalize(target))
    } else {
        (normalize(&absolute(out_dir)), normalize(&absolute(target)))
    };

    let common = from
        .components()
        .zip(to.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in from.components().skip(common) {
        relative.push("..");
    }
    for component in to.components().skip(common) {
        relative.push(component);
    }

    let text = relative.to_string_lossy().replace('\\', "/");
    let text = script_specifier(&text);
    if text.starts_with("../") {
        text
    } else {
        format!("./{}", text)
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Drop `.` segments and fold `..` into the preceding segment where possible.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) =>
            {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn script_specifier(path: &str) -> String {
    const EXTENSIONS: [(&str, &str); 5] = [
        (".d.ts", ""),
        (".tsx", ""),
        (".ts", ""),
        (".mts", ".mjs"),
        (".cts", ".cjs"),
    ];

    EXTENSIONS
        .iter()
        .find_map(|(ext, replacement)| {
            path.strip_suffix(ext)
                .map(|stem| format!("{}{}", stem, replacement))
        })
        .unwrap_or_else(|| path.to_string())
}
