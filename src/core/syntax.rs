//! Host-neutral view of the declarations the collector reads.
//!
//! The extraction phase lowers swc AST nodes into these types so that the
//! collection pass is a plain fold over `ClassDeclaration` values and can be
//! exercised without parsing any source text.

use std::fmt;

/// Pure location data (file path + line + column).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// Location plus the source line it points into, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }
}

/// How an argument was associated with a parameter name, if at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentLabel {
    /// `@Register(registerTypeName = "Inventory")`
    Equals(String),
    /// `@Register({ registerTypeName: "Inventory" })`
    Colon(String),
}

impl ArgumentLabel {
    pub fn name(&self) -> &str {
        match self {
            ArgumentLabel::Equals(name) | ArgumentLabel::Colon(name) => name,
        }
    }
}

/// Shape of an argument expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentExpr {
    /// `Container.Member`; only the trailing member is kept.
    MemberAccess { member: String },
    /// Literal text. Strings carry their value without quotes.
    Literal(String),
    /// A bare identifier.
    Identifier(String),
    /// Any other expression; the payload names the shape for diagnostics.
    Other(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerArgument {
    /// Position of the call argument this came from. Properties of one object
    /// literal share its index.
    pub index: usize,
    pub label: Option<ArgumentLabel>,
    pub value: ArgumentExpr,
}

impl MarkerArgument {
    pub fn positional(value: ArgumentExpr) -> Self {
        Self {
            index: 0,
            label: None,
            value,
        }
    }

    pub fn labeled(label: ArgumentLabel, value: ArgumentExpr) -> Self {
        Self {
            index: 0,
            label: Some(label),
            value,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// A decorator attached to a class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Dotted callee text, e.g. `Register` or `decorators.Register`.
    pub name: String,
    pub arguments: Vec<MarkerArgument>,
}

/// A class declaration as seen by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    /// Nearest enclosing namespace's dotted name; empty at the root.
    pub namespace: String,
    pub name: String,
    /// Inheritance list in declaration order: superclass first, then `implements`.
    pub base_types: Vec<String>,
    /// Decorators in source order.
    pub markers: Vec<Marker>,
    pub context: SourceContext,
    /// Set when the declaring file is an ES module; `None` for global scripts.
    pub module: Option<ModuleOrigin>,
}

/// Name a module exports a declaration under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportName {
    Named(String),
    Default,
}

/// What an import binding refers to in its source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Named(String),
    Default,
    /// `import * as models from "..."`
    Namespace,
}

impl From<ExportName> for ImportedName {
    fn from(name: ExportName) -> Self {
        match name {
            ExportName::Named(name) => ImportedName::Named(name),
            ExportName::Default => ImportedName::Default,
        }
    }
}

/// Target of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A project file: relative specifiers joined onto the importing file's
    /// directory, or the declaring file itself. Not normalized.
    File(String),
    /// A bare package specifier, used as written.
    Package(String),
}

/// A module-scoped binding the generated file has to import as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeImport {
    /// Binding name in the declaring module.
    pub local: String,
    pub imported: ImportedName,
    pub source: ImportSource,
}

/// Module facts of a class declared in an ES module.
///
/// A module's top-level bindings are invisible to other files unless
/// imported, so the generated file needs to know how to import the class and
/// the base type it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOrigin {
    /// `None` unless the class is declared at the top level and exported.
    pub export: Option<ExportName>,
    /// Import for the first base type, when it is bound in module scope.
    pub base_import: Option<TypeImport>,
}

/// Whether `name` is a valid TypeScript identifier (ASCII `$`/`_` plus Unicode letters).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
