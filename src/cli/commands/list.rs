use std::time::Instant;

use anyhow::Result;

use super::super::args::ListCommand;
use super::{CommandResult, CommandSummary, ListSummary};
use crate::core::{GenerateContext, collect::collect_registries};

/// Collect registries without rendering or writing anything.
pub fn list(cmd: ListCommand) -> Result<CommandResult> {
    let started = Instant::now();
    let ctx = GenerateContext::new(&cmd.common, None)?;
    let declarations = ctx.declarations()?;

    let outcome = collect_registries(&declarations, &ctx.config.collect_options())
        .map(|groups| CommandSummary::List(ListSummary { groups }));

    Ok(CommandResult {
        outcome,
        source_files_scanned: ctx.files.len(),
        elapsed: Some(started.elapsed()),
    })
}
