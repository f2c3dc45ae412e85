//! Report formatting and printing utilities.
//!
//! Register errors are displayed cargo-style; command summaries as one-line
//! status messages. Separate from core logic to allow reggen to be used as a
//! library.

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, GenerateOutcome, GenerateSummary, InitSummary, ListSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{
    RegisterError, SourceContext,
    emit::{UNTYPED_BASE, helper_name},
    sink::WriteOutcome,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Set to any value to suppress the verbose timing line.
pub const DISABLE_TIMING_ENV: &str = "REGGEN_DISABLE_TIMING";

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());

    if verbose
        && env::var_os(DISABLE_TIMING_ENV).is_none()
        && let Some(elapsed) = result.elapsed
    {
        print_timing_to(elapsed, &mut io::stderr().lock());
    }
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.outcome {
        Ok(CommandSummary::Generate(summary)) => {
            print_generate(summary, result.source_files_scanned, verbose, writer)
        }
        Ok(CommandSummary::List(summary)) => {
            print_list(summary, result.source_files_scanned, writer)
        }
        Ok(CommandSummary::Init(summary)) => print_init(summary, writer),
        Err(error) => report_to(error, writer),
    }
}

/// Print a register error in cargo-style format.
pub fn report_to<W: Write>(error: &RegisterError, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        "error".bold().red(),
        error,
        error.code().dimmed().cyan()
    );

    let max_line_width = error
        .context()
        .map(|ctx| ctx.location.line.to_string().len())
        .unwrap_or(1);

    if let Some(ctx) = error.context() {
        print_source_context(ctx, writer, max_line_width);
    }

    if let Some(note) = error.note() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            note,
            width = max_line_width
        );
    }

    if let Some(hint) = error.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(
        writer,
        "\n{} {}",
        FAILURE_MARK.red(),
        "Generation aborted - no files were written".red()
    );
}

// ============================================================
// Internal Functions
// ============================================================

fn print_source_context<W: Write>(ctx: &SourceContext, writer: &mut W, max_line_width: usize) {
    let loc = &ctx.location;

    // Print clickable location: --> path:line:col
    let _ = writeln!(writer, "  {} {}", "-->".blue(), loc);

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        loc.line.to_string().blue(),
        "|".blue(),
        ctx.source_line,
        width = max_line_width
    );

    // Caret pointing to the column (col is 1-based)
    let prefix = if loc.col > 1 {
        ctx.source_line.chars().take(loc.col - 1).collect::<String>()
    } else {
        String::new()
    };
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".red(),
        width = max_line_width,
        padding = caret_padding
    );
}

fn print_generate<W: Write>(
    summary: &GenerateSummary,
    source_files: usize,
    verbose: bool,
    writer: &mut W,
) {
    match &summary.outcome {
        GenerateOutcome::Written(written) => {
            for (path, outcome) in written {
                let label = match outcome {
                    WriteOutcome::Created => "created".green().bold(),
                    WriteOutcome::Updated => "updated".yellow().bold(),
                    WriteOutcome::Unchanged if verbose => "unchanged".dimmed(),
                    WriteOutcome::Unchanged => continue,
                };
                let _ = writeln!(writer, "  {} {}", label, path.display());
            }

            if summary.registry_count == 0 {
                print_nothing_registered(source_files, writer);
                return;
            }

            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Generated {} {} ({} {}) from {} source {}",
                    summary.registry_count,
                    plural(summary.registry_count, "registry", "registries"),
                    summary.class_count,
                    plural(summary.class_count, "class", "classes"),
                    source_files,
                    plural(source_files, "file", "files")
                )
                .green()
            );
        }
        GenerateOutcome::Checked { checked, stale } => {
            print_check(*checked, stale, source_files, writer)
        }
    }
}

fn print_check<W: Write>(checked: usize, stale: &[PathBuf], source_files: usize, writer: &mut W) {
    if stale.is_empty() {
        if checked == 0 {
            print_nothing_registered(source_files, writer);
        } else {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "{} generated {} up to date",
                    checked,
                    plural(checked, "file is", "files are")
                )
                .green()
            );
        }
        return;
    }

    for path in stale {
        let _ = writeln!(writer, "  {} {}", "stale".yellow().bold(), path.display());
    }
    let _ = writeln!(
        writer,
        "{} {} of {} generated {} out of date (run {} to update)",
        FAILURE_MARK.red(),
        stale.len(),
        checked,
        plural(checked, "file is", "files are"),
        "reggen generate".cyan()
    );
}

fn print_list<W: Write>(summary: &ListSummary, source_files: usize, writer: &mut W) {
    if summary.groups.is_empty() {
        print_nothing_registered(source_files, writer);
        return;
    }

    for (registry_name, group) in summary.groups.iter() {
        let Some(canonical) = group.canonical() else {
            continue;
        };
        let helper = if canonical.namespace.is_empty() {
            helper_name(registry_name)
        } else {
            format!("{}.{}", canonical.namespace, helper_name(registry_name))
        };
        let base = if canonical.base_type_name.is_empty() {
            UNTYPED_BASE
        } else {
            canonical.base_type_name.as_str()
        };

        let _ = writeln!(
            writer,
            "{} {} {}",
            registry_name.bold(),
            "->".blue(),
            format!("{} (base: {})", helper, base).dimmed()
        );

        let name_width = group
            .members()
            .iter()
            .map(|m| UnicodeWidthStr::width(m.self_type_name.as_str()))
            .max()
            .unwrap_or(0);
        for member in group.members() {
            let padding = name_width - UnicodeWidthStr::width(member.self_type_name.as_str());
            let _ = writeln!(
                writer,
                "  {}{:padding$}  {}",
                member.self_type_name,
                "",
                member.context.location.to_string().dimmed(),
                padding = padding
            );
        }
    }

    let _ = writeln!(
        writer,
        "\n{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Found {} {} ({} {}) in {} source {}",
            summary.groups.len(),
            plural(summary.groups.len(), "registry", "registries"),
            summary.groups.match_count(),
            plural(summary.groups.match_count(), "class", "classes"),
            source_files,
            plural(source_files, "file", "files")
        )
        .green()
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn print_nothing_registered<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Scanned {} source {} - no registered classes found",
            source_files,
            plural(source_files, "file", "files")
        )
        .green()
    );
}

fn print_timing_to<W: Write>(elapsed: Duration, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} in {:.2?}",
        "Finished".green().bold(),
        elapsed
    );
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
