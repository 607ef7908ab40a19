use std::process::Command;

use anyhow::{Context, Result};

use crate::cli::TestArgs;
use crate::commands::build;

/// Builds a test driver (every `test_`-prefixed top-level function called
/// and tallied) and runs it, reporting the driver's own pass/fail verdict.
pub fn run(args: TestArgs) -> Result<bool> {
    let Some(driver) = build::compile(&args.build, true)? else {
        return Ok(false);
    };

    let status = Command::new(&driver)
        .status()
        .with_context(|| format!("running {}", driver.display()))?;
    Ok(status.success())
}
