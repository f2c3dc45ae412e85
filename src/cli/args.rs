//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Write registry files (or verify them with `--check`)
//! - `list`: Show discovered registries without writing anything
//! - `init`: Initialize reggen configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.common.verbose,
            Some(Command::List(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory (config file search starts here)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output directory for generated files (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Only verify that generated files are up to date (writes nothing)
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate registry lookup tables from decorated classes
    Generate(GenerateCommand),
    /// List registries and their classes without writing files
    List(ListCommand),
    /// Initialize a new .reggenrc.json configuration file
    Init,
}
