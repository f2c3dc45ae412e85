//! Dispatches to the appropriate command handler based on the parsed arguments.
//!
//! # Returns
//! - `Ok(CommandResult)` with the command summary or the register error that aborted it
//! - `Err` if the command fails (e.g., invalid config, unreadable or unparsable files)

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, generate::generate, init::init, list::list},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Generate(cmd)) => generate(cmd),
        Some(Command::List(cmd)) => list(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
