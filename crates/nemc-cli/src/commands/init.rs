use anyhow::Result;
use nemc_pm::{Manifest, PackageKind, Version};
use std::collections::HashMap;

use crate::cli::InitArgs;

pub fn run(args: InitArgs) -> Result<()> {
    std::fs::create_dir_all(&args.path)?;
    std::fs::create_dir_all(args.path.join("src"))?;

    let name = args
        .path
        .canonicalize()?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "package".to_string());

    let manifest_path = args.path.join(Manifest::FILE_NAME);
    if manifest_path.exists() {
        anyhow::bail!("{} already exists", manifest_path.display());
    }

    let manifest = Manifest {
        kind: if args.lib {
            PackageKind::Library
        } else {
            PackageKind::Application
        },
        name,
        version: Version::parse("0.1.0")?,
        builtin: false,
        dependencies: HashMap::new(),
    };
    manifest.write_to(&manifest_path)?;

    let main_path = args.path.join("src/main.ns");
    if !args.lib && !main_path.exists() {
        std::fs::write(main_path, "fn main(): void {\n\n}\n")?;
    }

    log::info!("initialised package at {}", args.path.display());
    Ok(())
}
