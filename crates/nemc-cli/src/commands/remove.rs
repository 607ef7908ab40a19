use anyhow::Result;
use nemc_pm::Manifest;

use crate::cli::RemoveArgs;

pub fn run(args: RemoveArgs) -> Result<()> {
    let mut manifest = Manifest::parse_file(Manifest::FILE_NAME)?;

    nemc_pm::resolver::remove_dependency(&mut manifest, &args.name)?;

    manifest.write_to(Manifest::FILE_NAME)?;
    log::info!("removed dependency `{}`", args.name);
    Ok(())
}
