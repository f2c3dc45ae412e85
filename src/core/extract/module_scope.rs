use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use swc_common::BytePos;
use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, Expr, ImportSpecifier, Module, ModuleDecl,
    ModuleExportName, ModuleItem, Stmt, TsModuleName,
};

use crate::core::syntax::{ExportName, ImportSource, ImportedName, ModuleOrigin, TypeImport};

/// Top-level bindings of an ES module: what it imports and what it exports.
///
/// Files without any `import`/`export` are global scripts and get no scope.
#[derive(Debug, Default)]
pub struct ModuleScope {
    /// Local binding → source module.
    imports: HashMap<String, (ImportedName, String)>,
    /// Local binding → exported name. First export wins.
    exports: HashMap<String, ExportName>,
    /// Identifier positions of classes declared at the top level.
    top_level_classes: HashSet<BytePos>,
}

impl ModuleScope {
    pub fn of(module: &Module) -> Option<Self> {
        if !module
            .body
            .iter()
            .any(|item| matches!(item, ModuleItem::ModuleDecl(_)))
        {
            return None;
        }

        let mut scope = Self::default();
        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(decl) => scope.add_module_decl(decl),
                ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) => {
                    scope.top_level_classes.insert(class_decl.ident.span.lo);
                }
                ModuleItem::Stmt(_) => {}
            }
        }
        Some(scope)
    }

    fn add_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                let source = import.src.value.to_string_lossy().to_string();
                for specifier in &import.specifiers {
                    let (local, imported) = match specifier {
                        ImportSpecifier::Named(named) => {
                            let imported = named
                                .imported
                                .as_ref()
                                .map(export_name_text)
                                .unwrap_or_else(|| named.local.sym.to_string());
                            (&named.local, imported_name(imported))
                        }
                        ImportSpecifier::Default(default) => (&default.local, ImportedName::Default),
                        ImportSpecifier::Namespace(namespace) => {
                            (&namespace.local, ImportedName::Namespace)
                        }
                    };
                    self.imports
                        .insert(local.sym.to_string(), (imported, source.clone()));
                }
            }
            ModuleDecl::ExportDecl(export) => {
                if let Decl::Class(class_decl) = &export.decl {
                    self.top_level_classes.insert(class_decl.ident.span.lo);
                }
                if let Some(name) = declared_name(&export.decl) {
                    self.export(name.clone(), ExportName::Named(name));
                }
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                let name = match &export.decl {
                    DefaultDecl::Class(class_expr) => {
                        if let Some(ident) = &class_expr.ident {
                            self.top_level_classes.insert(ident.span.lo);
                        }
                        class_expr.ident.as_ref()
                    }
                    DefaultDecl::Fn(fn_expr) => fn_expr.ident.as_ref(),
                    DefaultDecl::TsInterfaceDecl(interface) => Some(&interface.id),
                };
                if let Some(ident) = name {
                    self.export(ident.sym.to_string(), ExportName::Default);
                }
            }
            ModuleDecl::ExportDefaultExpr(export) => {
                if let Expr::Ident(ident) = &*export.expr {
                    self.export(ident.sym.to_string(), ExportName::Default);
                }
            }
            // `export { Foo, Bar as Baz }`; re-exports from other modules bind nothing here.
            ModuleDecl::ExportNamed(named) if named.src.is_none() => {
                for specifier in &named.specifiers {
                    let ExportSpecifier::Named(specifier) = specifier else {
                        continue;
                    };
                    let local = export_name_text(&specifier.orig);
                    let exported = specifier
                        .exported
                        .as_ref()
                        .map(export_name_text)
                        .unwrap_or_else(|| local.clone());
                    let exported = if exported == "default" {
                        ExportName::Default
                    } else {
                        ExportName::Named(exported)
                    };
                    self.export(local, exported);
                }
            }
            _ => {}
        }
    }

    fn export(&mut self, local: String, exported: ExportName) {
        self.exports.entry(local).or_insert(exported);
    }

    /// Module facts for the class named `name` whose identifier starts at `pos`.
    pub fn origin(
        &self,
        file_path: &str,
        name: &str,
        pos: BytePos,
        base_type: Option<&str>,
    ) -> ModuleOrigin {
        let export = if self.top_level_classes.contains(&pos) {
            self.exports.get(name).cloned()
        } else {
            None
        };

        ModuleOrigin {
            export,
            base_import: base_type.and_then(|base| self.type_import(file_path, base)),
        }
    }

    /// Import needed to name `type_text` outside this module, keyed by its
    /// leading identifier (`models.Item<T>` → `models`).
    fn type_import(&self, file_path: &str, type_text: &str) -> Option<TypeImport> {
        let root: String = type_text
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
            .collect();

        if let Some((imported, specifier)) = self.imports.get(&root) {
            let source = if specifier.starts_with('.') {
                let dir = Path::new(file_path).parent().unwrap_or(Path::new(""));
                ImportSource::File(dir.join(specifier).to_string_lossy().to_string())
            } else {
                ImportSource::Package(specifier.clone())
            };
            return Some(TypeImport {
                local: root,
                imported: imported.clone(),
                source,
            });
        }

        let exported = self.exports.get(&root)?;
        Some(TypeImport {
            local: root,
            imported: exported.clone().into(),
            source: ImportSource::File(file_path.to_string()),
        })
    }
}

fn export_name_text(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
    }
}

fn imported_name(name: String) -> ImportedName {
    if name == "default" {
        ImportedName::Default
    } else {
        ImportedName::Named(name)
    }
}

/// Binding introduced by an exported declaration that can name a type.
fn declared_name(decl: &Decl) -> Option<String> {
    match decl {
        Decl::Class(class_decl) => Some(class_decl.ident.sym.to_string()),
        Decl::TsInterface(interface) => Some(interface.id.sym.to_string()),
        Decl::TsTypeAlias(alias) => Some(alias.id.sym.to_string()),
        Decl::TsEnum(ts_enum) => Some(ts_enum.id.sym.to_string()),
        Decl::TsModule(module) => match &module.id {
            TsModuleName::Ident(ident) => Some(ident.sym.to_string()),
            TsModuleName::Str(_) => None,
        },
        _ => None,
    }
}
