use std::time::Instant;

use anyhow::Result;

use super::super::args::GenerateCommand;
use super::{CommandResult, CommandSummary, GenerateOutcome, GenerateSummary};
use crate::core::{
    GenerateContext,
    sink::{CheckSink, DirectorySink, write_all},
};

/// Run a full pass and hand the units to the sink selected by `--check`.
///
/// Register errors end up in the result; the sink is never reached for a
/// failed pass, so no file is touched.
pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let started = Instant::now();
    let ctx = GenerateContext::new(&cmd.common, cmd.out_dir.as_deref())?;
    let declarations = ctx.declarations()?;

    let generation = match ctx.generate(&declarations) {
        Ok(generation) => generation,
        Err(error) => {
            return Ok(CommandResult {
                outcome: Err(error),
                source_files_scanned: ctx.files.len(),
                elapsed: Some(started.elapsed()),
            });
        }
    };

    let out_dir = ctx.out_dir();
    let outcome = if cmd.check {
        let mut sink = CheckSink::new(&out_dir);
        write_all(&mut sink, &generation.units)?;
        GenerateOutcome::Checked {
            checked: sink.checked,
            stale: sink.stale,
        }
    } else {
        let mut sink = DirectorySink::new(&out_dir);
        write_all(&mut sink, &generation.units)?;
        if ctx.verbose {
            eprintln!(
                "Wrote {} of {} file(s) in {}",
                sink.changed_count(),
                sink.written.len(),
                sink.out_dir().display()
            );
        }
        GenerateOutcome::Written(sink.written)
    };

    Ok(CommandResult {
        outcome: Ok(CommandSummary::Generate(GenerateSummary {
            out_dir,
            registry_count: generation.groups.len(),
            class_count: generation.groups.match_count(),
            outcome,
        })),
        source_files_scanned: ctx.files.len(),
        elapsed: Some(started.elapsed()),
    })
}
