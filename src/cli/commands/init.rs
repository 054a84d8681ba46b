use std::{fs, path::Path};

use anyhow::{Context, Result, bail};

use super::super::args::InitArgs;
use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init(args: &InitArgs, dir: &Path) -> Result<CommandResult> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let exists = config_path.exists();

    if exists && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            CONFIG_FILE_NAME
        );
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(CommandResult::new(CommandSummary::Init(InitSummary {
        path: config_path,
        overwritten: exists,
    })))
}
