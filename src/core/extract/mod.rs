//! Declaration extraction - lowers swc ASTs into [`ClassDeclaration`]s.
//!
//! One `DeclarationCollector` pass per file walks the module in source order and
//! records every named class declaration together with its decorators, its
//! inheritance list and the nearest enclosing namespace. The collector keeps a
//! namespace stack. Files that are ES modules also get a [`ModuleScope`] so that
//! each class records how it can be imported.
//!
//! ## Module Structure
//!
//! - `markers`: Decorator and argument lowering
//! - `module_scope`: Imports and exports of ES module files

mod markers;
mod module_scope;

use swc_common::{SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::{
    Class, ClassDecl, DefaultDecl, ExportDefaultDecl, Expr, Ident, TsModuleDecl, TsModuleName,
    TsNamespaceBody,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{
    parsers::ts::ParsedSource,
    syntax::{ClassDeclaration, SourceContext, SourceLocation},
};

pub use markers::{dotted_name, lower_decorator};
pub use module_scope::ModuleScope;

/// Extract every class declaration of a parsed file, in source order.
pub fn extract_declarations(parsed: &ParsedSource) -> Vec<ClassDeclaration> {
    let mut collector = DeclarationCollector::new(&parsed.file_path, &parsed.source_map);
    collector.scope = ModuleScope::of(&parsed.module);
    parsed.module.visit_with(&mut collector);
    collector.declarations
}

pub struct DeclarationCollector<'a> {
    file_path: &'a str,
    source_map: &'a SourceMap,
    /// Enclosing namespace names, innermost last.
    namespaces: Vec<String>,
    /// `None` for global scripts.
    pub scope: Option<ModuleScope>,
    pub declarations: Vec<ClassDeclaration>,
}

impl<'a> DeclarationCollector<'a> {
    pub fn new(file_path: &'a str, source_map: &'a SourceMap) -> Self {
        Self {
            file_path,
            source_map,
            namespaces: Vec::new(),
            scope: None,
            declarations: Vec::new(),
        }
    }

    fn source_context(&self, span: Span) -> SourceContext {
        let loc = self.source_map.lookup_char_pos(span.lo);
        let source_line = loc
            .file
            .get_line(loc.line - 1)
            .map(|cow| cow.to_string())
            .unwrap_or_default();
        SourceContext::new(
            SourceLocation::new(self.file_path, loc.line, loc.col_display + 1),
            source_line,
        )
    }

    fn snippet(&self, span: Span) -> Option<String> {
        self.source_map.span_to_snippet(span).ok()
    }

    /// Text of a base type reference: dotted path when possible, source text otherwise.
    fn type_reference(&self, expr: &Expr) -> String {
        dotted_name(expr)
            .or_else(|| self.snippet(expr.span()))
            .unwrap_or_default()
    }

    fn base_types(&self, class: &Class) -> Vec<String> {
        let mut base_types = Vec::new();

        if let Some(super_class) = &class.super_class {
            let mut text = self.type_reference(super_class);
            if let Some(type_args) = class
                .super_type_params
                .as_ref()
                .and_then(|params| self.snippet(params.span))
            {
                text.push_str(&type_args);
            }
            base_types.push(text);
        }

        for implemented in &class.implements {
            let text = self
                .snippet(implemented.span)
                .unwrap_or_else(|| self.type_reference(&implemented.expr));
            base_types.push(text);
        }

        base_types
    }

    fn record_class(&mut self, ident: &Ident, class: &Class) {
        let markers = class
            .decorators
            .iter()
            .filter_map(|decorator| lower_decorator(decorator, self.source_map))
            .collect();

        let name = ident.sym.to_string();
        let base_types = self.base_types(class);
        let module = self.scope.as_ref().map(|scope| {
            scope.origin(
                self.file_path,
                &name,
                ident.span.lo,
                base_types.first().map(String::as_str),
            )
        });

        self.declarations.push(ClassDeclaration {
            namespace: self.namespaces.last().cloned().unwrap_or_default(),
            name,
            base_types,
            markers,
            context: self.source_context(ident.span),
            module,
        });
    }
}

impl Visit for DeclarationCollector<'_> {
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.record_class(&node.ident, &node.class);
        node.visit_children_with(self);
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl) {
        if let DefaultDecl::Class(class_expr) = &node.decl
            && let Some(ident) = &class_expr.ident
        {
            self.record_class(ident, &class_expr.class);
        }
        node.visit_children_with(self);
    }

    fn visit_ts_module_decl(&mut self, node: &TsModuleDecl) {
        // `declare global {}` and `declare module "x" {}` are not namespaces.
        let TsModuleName::Ident(ident) = &node.id else {
            node.visit_children_with(self);
            return;
        };
        if node.global {
            node.visit_children_with(self);
            return;
        }

        // `namespace Game.Data {}` is one declaration named `Game.Data`.
        let mut segments = vec![ident.sym.to_string()];
        let mut body = node.body.as_ref();
        while let Some(TsNamespaceBody::TsNamespaceDecl(inner)) = body {
            segments.push(inner.id.sym.to_string());
            body = Some(&*inner.body);
        }

        self.namespaces.push(segments.join("."));
        if let Some(body) = body {
            body.visit_with(self);
        }
        self.namespaces.pop();
    }
}
