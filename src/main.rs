use std::process::{self, ExitCode};

use clap::Parser;
use colored::Colorize;
use txcontext::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("\nInterrupted");
        process::exit(ExitStatus::Interrupted.code());
    }) {
        eprintln!(
            "{} Failed to install the interrupt handler: {}",
            "warning:".bold().yellow(),
            err
        );
    }

    match txcontext::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            let status = ExitStatus::from_error(&err);
            if status == ExitStatus::Interrupted {
                eprintln!("\nInterrupted");
            } else {
                eprintln!("{} {:#}", "error:".bold().red(), err);
            }
            status.into()
        }
    }
}
