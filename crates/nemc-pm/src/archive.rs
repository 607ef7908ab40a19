//! Package archive layout: a zip whose top-level directory matches the
//! package name, containing `nemesis.manifest`, `src/` and `cpp/`.
//! Grounded on `manager::unzip_package_manifest`/`extract_package_archive`.

use std::io::{Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;

use crate::error::PmError;
use crate::manifest::Manifest;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Reads the manifest out of an in-memory archive without extracting it.
pub fn read_manifest(archive_bytes: &[u8], package_name: &str) -> Result<Manifest, PmError> {
    let cursor = std::io::Cursor::new(archive_bytes);
    let mut zip = zip::ZipArchive::new(cursor)?;
    let manifest_path = format!("{package_name}/{}", Manifest::FILE_NAME);
    let mut entry = zip.by_name(&manifest_path)?;
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(Manifest::parse(&contents)?)
}

/// Extracts every entry of `archive_bytes` into `to`, preserving the
/// top-level `<package_name>/` prefix.
pub fn extract(archive_bytes: &[u8], to: impl AsRef<Path>) -> Result<(), PmError> {
    let cursor = std::io::Cursor::new(archive_bytes);
    let mut zip = zip::ZipArchive::new(cursor)?;
    let to = to.as_ref();

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = to.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        std::fs::write(out_path, contents)?;
    }
    Ok(())
}

/// Builds an in-memory archive from a package directory, used when
/// publishing a library built locally.
pub fn build(package_dir: impl AsRef<Path>, package_name: &str) -> Result<Vec<u8>, PmError> {
    let package_dir = package_dir.as_ref();
    let mut buffer = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default();

    for entry in walk(package_dir)? {
        let relative = entry.strip_prefix(package_dir).unwrap();
        let archive_path = Path::new(package_name).join(relative);
        let archive_path = archive_path.to_string_lossy().replace('\\', "/");

        if entry.is_dir() {
            writer.add_directory(format!("{archive_path}/"), options)?;
        } else {
            writer.start_file(archive_path, options)?;
            let contents = std::fs::read(&entry)?;
            writer.write_all(&contents)?;
        }
    }

    writer.finish()?;
    Ok(buffer.into_inner())
}

fn walk(dir: &Path) -> Result<Vec<std::path::PathBuf>, PmError> {
    let mut entries = vec![];
    if !dir.exists() {
        return Ok(entries);
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        entries.push(path.clone());
        if path.is_dir() {
            entries.extend(walk(&path)?);
        }
    }
    Ok(entries)
}
