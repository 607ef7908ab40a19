//! `nemesis.lock` parser/writer.
//!
//! `@application`/`@library`, one `name:version:builtin:hash:path` record
//! for the package itself, then `@dependencies` with one such record per
//! line in topological (compilation) order. Grounded on
//! `nemesis::pm::lock`/`lock::info`.

use std::path::Path;

use crate::error::PmError;
use crate::manifest::PackageKind;
use crate::version::{is_valid_hash_value, Version};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: Version,
    pub builtin: bool,
    pub hash: String,
    pub path: String,
}

impl LockedPackage {
    fn parse_record(line: &str, line_no: usize) -> Result<Self, PmError> {
        let fields: Vec<&str> = line.splitn(5, ':').collect();
        let [name, version, builtin, hash, path] = fields.as_slice() else {
            return Err(PmError::MalformedLockfile {
                line: line_no,
                message: "expected `name:version:builtin:hash:path`".to_string(),
            });
        };
        let builtin = match *builtin {
            "true" => true,
            "false" => false,
            other => return Err(PmError::InvalidBoolean(other.to_string())),
        };
        if !is_valid_hash_value(hash) {
            return Err(PmError::InvalidHash((*hash).to_string()));
        }
        Ok(LockedPackage {
            name: name.to_string(),
            version: Version::parse(version)?,
            builtin,
            hash: (*hash).to_string(),
            path: path.to_string(),
        })
    }

    fn render(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.name, self.version, self.builtin, self.hash, self.path
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lockfile {
    pub kind: PackageKind,
    pub package: LockedPackage,
    /// In topological (compile) order: dependencies before dependents.
    pub dependencies: Vec<LockedPackage>,
}

impl Lockfile {
    pub const FILE_NAME: &'static str = "nemesis.lock";

    pub fn parse(source: &str) -> Result<Self, PmError> {
        let mut lines = source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (header_no, header) = lines.next().ok_or_else(|| PmError::MalformedLockfile {
            line: 0,
            message: "empty lockfile".to_string(),
        })?;
        let kind = match header.trim() {
            "@application" => PackageKind::Application,
            "@library" => PackageKind::Library,
            other => {
                return Err(PmError::MalformedLockfile {
                    line: header_no + 1,
                    message: format!("expected `@application` or `@library`, found `{other}`"),
                })
            }
        };

        let (pkg_no, pkg_line) = lines.next().ok_or_else(|| PmError::MalformedLockfile {
            line: header_no + 1,
            message: "missing package record".to_string(),
        })?;
        let package = LockedPackage::parse_record(pkg_line.trim(), pkg_no + 1)?;

        let mut dependencies = vec![];
        let mut in_dependencies = false;
        for (idx, line) in lines {
            let line = line.trim();
            if line == "@dependencies" {
                in_dependencies = true;
                continue;
            }
            if !in_dependencies {
                return Err(PmError::MalformedLockfile {
                    line: idx + 1,
                    message: "expected `@dependencies`".to_string(),
                });
            }
            dependencies.push(LockedPackage::parse_record(line, idx + 1)?);
        }

        Ok(Lockfile {
            kind,
            package,
            dependencies,
        })
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, PmError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n{}\n", self.kind, self.package.render());
        if !self.dependencies.is_empty() {
            out.push_str("@dependencies\n");
            for dep in &self.dependencies {
                out.push_str(&dep.render());
                out.push('\n');
            }
        }
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PmError> {
        std::fs::write(path, self.render())?;
        Ok(())
    }

    /// Compilation order: dependencies first (as resolved), package last.
    pub fn compilation_chain(&self) -> Vec<&LockedPackage> {
        let mut chain: Vec<&LockedPackage> = self.dependencies.iter().collect();
        chain.push(&self.package);
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lockfile {
        Lockfile {
            kind: PackageKind::Application,
            package: LockedPackage {
                name: "demo".to_string(),
                version: Version::parse("0.1.0").unwrap(),
                builtin: false,
                hash: "abc123".to_string(),
                path: ".".to_string(),
            },
            dependencies: vec![LockedPackage {
                name: "core".to_string(),
                version: Version::parse("2.0.0").unwrap(),
                builtin: true,
                hash: "deadbeef".to_string(),
                path: "libs/core".to_string(),
            }],
        }
    }

    #[test]
    fn test_roundtrip() {
        let lock = sample();
        let rendered = lock.render();
        let reparsed = Lockfile::parse(&rendered).unwrap();
        assert_eq!(lock, reparsed);
    }

    #[test]
    fn test_compilation_chain_puts_dependencies_first() {
        let lock = sample();
        let chain = lock.compilation_chain();
        assert_eq!(chain[0].name, "core");
        assert_eq!(chain[1].name, "demo");
    }

    #[test]
    fn test_rejects_bad_hash() {
        let source = "@application\ndemo:0.1.0:false:not-hex!:.\n";
        let err = Lockfile::parse(source).unwrap_err();
        assert!(matches!(err, PmError::InvalidHash(_)));
    }
}
