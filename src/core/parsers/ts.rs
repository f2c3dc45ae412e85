use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use swc_common::{FileName, Globals, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed TypeScript source file.
pub struct ParsedSource {
    pub file_path: String,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Whether the file should be parsed with JSX enabled.
fn is_tsx(file_path: &str) -> bool {
    Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == "tsx")
}

/// Parse TypeScript source code string into an AST.
///
/// Decorators are always enabled; JSX only for `.tsx` files.
/// Accepts a shared SourceMap so files can be parsed on worker threads.
pub fn parse_ts_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: is_tsx(file_path),
            decorators: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser.parse_module().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            anyhow!(
                "{}:{}:{}: {}",
                file_path,
                loc.line,
                loc.col_display + 1,
                e.kind().msg()
            )
        })?;

        Ok(ParsedSource {
            file_path: file_path.to_string(),
            module,
            source_map,
        })
    })
}
