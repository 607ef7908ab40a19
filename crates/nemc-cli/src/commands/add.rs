use anyhow::Result;
use nemc_pm::{Manifest, Version};

use crate::cli::AddArgs;

pub fn run(args: AddArgs) -> Result<()> {
    let mut manifest = Manifest::parse_file(Manifest::FILE_NAME)?;

    let version = args.version.map(|v| Version::parse(&v)).transpose()?;
    nemc_pm::resolver::add_dependency(&mut manifest, &args.name, version)?;

    manifest.write_to(Manifest::FILE_NAME)?;
    log::info!("added dependency `{}`", args.name);
    Ok(())
}
