use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        ClassDeclaration, EmitOptions, Generation, RegisterError,
        extract::extract_declarations,
        file_scanner::scan_files,
        generate,
        parsers::ts::{ParsedSource, parse_ts_source},
    },
};

/// Everything one generation pass needs: merged config, project root and the
/// files to scan.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--out-dir src/registries`)
/// 2. `.reggenrc.json` config file
/// 3. Built-in defaults
pub struct GenerateContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// All source files to scan, sorted.
    pub files: BTreeSet<String>,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,
}

impl GenerateContext {
    /// Load config from the source root, apply CLI overrides and scan files.
    pub fn new(common_args: &CommonArgs, out_dir: Option<&Path>) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No .reggenrc.json found, using default configuration");
        }

        let mut config = config_result.config;
        if let Some(out_dir) = out_dir {
            config.out_dir = out_dir.to_string_lossy().to_string();
        }

        let scan_result = scan_files(
            path,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
        })
    }

    /// Output directory, resolved against the project root.
    pub fn out_dir(&self) -> PathBuf {
        resolve_against_root(&self.root_dir, Path::new(&self.config.out_dir))
    }

    /// Read and parse every scanned file.
    ///
    /// Files are parsed in parallel, each with its own SourceMap; the result
    /// keeps sorted path order. The first unreadable or unparsable file fails
    /// the whole pass.
    pub fn parse_sources(&self) -> Result<Vec<ParsedSource>> {
        let files: Vec<&String> = self.files.iter().collect();

        files
            .par_iter()
            .map(|file_path| {
                let code = std::fs::read_to_string(file_path)
                    .with_context(|| format!("Failed to read file: {}", file_path))?;
                let source_map = Arc::new(swc_common::SourceMap::default());
                parse_ts_source(code, file_path, source_map)
                    .with_context(|| format!("Failed to parse file: {}", file_path))
            })
            .collect()
    }

    /// Declarations of all files in walk order: files sorted by path,
    /// declarations in source order.
    pub fn declarations(&self) -> Result<Vec<ClassDeclaration>> {
        let parsed = self.parse_sources()?;
        if self.verbose {
            eprintln!("Parsed {} source file(s)", parsed.len());
        }
        Ok(parsed.iter().flat_map(extract_declarations).collect())
    }

    /// Run collection and emission over the given declarations.
    pub fn generate(
        &self,
        declarations: &[ClassDeclaration],
    ) -> std::result::Result<Generation, RegisterError> {
        let emit_options = EmitOptions {
            out_dir: self.out_dir(),
            ..self.config.emit_options()
        };
        generate(declarations, &self.config.collect_options(), &emit_options)
    }
}

fn resolve_against_root(root_dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
