//! Dispatches parsed arguments to the command handlers.
//!
//! # Returns
//! - `Ok(CommandResult)` with the error count and the summary to print
//! - `Err` if the command fails (config errors, unreadable input, missing API key)

use std::env;

use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, extract::extract, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;

    match command {
        Some(Command::Extract(args)) => extract(&args, &cwd),
        Some(Command::Init(args)) => init(&args, &cwd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
