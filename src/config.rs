use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    collect::{CollectOptions, DEFAULT_MARKER, DEFAULT_REGISTRY_ARGUMENT},
    emit::{DEFAULT_EXTENSION, EmitOptions},
    syntax::is_identifier,
};

pub const CONFIG_FILE_NAME: &str = ".reggenrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/__tests__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    /// Substring a decorator name must contain to register its class.
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Parameter name that carries the registry name.
    #[serde(default = "default_registry_argument")]
    pub registry_argument: String,
    /// Extension of generated files.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Reject registered classes that extend/implement nothing.
    #[serde(default)]
    pub require_base_type: bool,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_out_dir() -> String {
    "./src/generated".to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_registry_argument() -> String {
    DEFAULT_REGISTRY_ARGUMENT.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            ignore_test_files: default_ignore_test_files(),
            out_dir: default_out_dir(),
            marker: default_marker(),
            registry_argument: default_registry_argument(),
            extension: default_extension(),
            require_base_type: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid, the marker is empty,
    /// or the registry argument is not an identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.marker.is_empty() {
            bail!("'marker' must not be empty");
        }

        if !is_identifier(&self.registry_argument) {
            bail!(
                "'registryArgument' must be an identifier, got \"{}\"",
                self.registry_argument
            );
        }

        if self.extension.is_empty() || self.extension.starts_with('.') {
            bail!(
                "'extension' must be a bare extension such as \"ts\", got \"{}\"",
                self.extension
            );
        }

        Ok(())
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            marker: self.marker.clone(),
            registry_argument: self.registry_argument.clone(),
            require_base_type: self.require_base_type,
        }
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            extension: self.extension.clone(),
            out_dir: PathBuf::from(&self.out_dir),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
