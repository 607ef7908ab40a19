use anyhow::Result;

pub fn run() -> Result<()> {
    for dir in [".cache", "libs", "application"] {
        if std::path::Path::new(dir).exists() {
            if std::fs::metadata(dir)?.is_dir() {
                std::fs::remove_dir_all(dir)?;
            } else {
                std::fs::remove_file(dir)?;
            }
        }
    }
    log::info!("cleaned build artifacts and dependency cache");
    Ok(())
}
