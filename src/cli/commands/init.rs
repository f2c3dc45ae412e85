use std::{fs, path::Path};

use anyhow::{Result, bail};

use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write the default `.reggenrc.json` into the current directory.
pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;

    Ok(CommandResult {
        outcome: Ok(CommandSummary::Init(InitSummary { created: true })),
        source_files_scanned: 0,
        elapsed: None,
    })
}
