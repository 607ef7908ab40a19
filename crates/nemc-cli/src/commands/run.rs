use std::process::Command;

use anyhow::{Context, Result};

use crate::cli::RunArgs;
use crate::commands::build;

pub fn run(args: RunArgs) -> Result<i32> {
    let Some(executable) = build::compile(&args.build, false)? else {
        return Ok(1);
    };

    let status = Command::new(&executable)
        .args(&args.args)
        .status()
        .with_context(|| format!("running {}", executable.display()))?;
    Ok(status.code().unwrap_or(1))
}
