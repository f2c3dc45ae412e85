use std::{path::PathBuf, time::Duration};

use crate::{
    cli::ExitStatus,
    core::{RegisterError, RegistryGroups, sink::WriteOutcome},
};

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    List(ListSummary),
    Init(InitSummary),
}

/// What `generate` did with the rendered units.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// Files written (or left alone) in the output directory.
    Written(Vec<(PathBuf, WriteOutcome)>),
    /// `--check`: nothing written, `stale` lists missing or outdated files.
    Checked { checked: usize, stale: Vec<PathBuf> },
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub out_dir: PathBuf,
    pub registry_count: usize,
    pub class_count: usize,
    pub outcome: GenerateOutcome,
}

#[derive(Debug)]
pub struct ListSummary {
    pub groups: RegistryGroups,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running reggen commands
#[derive(Debug)]
pub struct CommandResult {
    /// The summary, or the error that aborted the collection pass.
    pub outcome: Result<CommandSummary, RegisterError>,
    /// Number of source files that were scanned.
    pub source_files_scanned: usize,
    /// Wall time of the pass; `None` for commands that do no scanning.
    pub elapsed: Option<Duration>,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match &self.outcome {
            Err(_) => ExitStatus::Failure,
            Ok(CommandSummary::Generate(GenerateSummary {
                outcome: GenerateOutcome::Checked { stale, .. },
                ..
            })) if !stale.is_empty() => ExitStatus::Failure,
            Ok(_) => ExitStatus::Success,
        }
    }
}
