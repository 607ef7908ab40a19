//! `nemesis.manifest` parser/writer.
//!
//! Line-oriented format: a `@application` or `@library` section header
//! carrying `name`/`version`/`builtin` `key value` pairs, `#`-prefixed
//! comments, blank lines ignored, then an optional `@dependencies` section
//! with one `name version` pair per line. Grounded on
//! `nemesis::pm::manifest`/`is_valid_package_name`/`is_valid_package_version`
//! /`is_valid_boolean_value` in the original implementation.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::PmError;
use crate::version::{is_valid_package_name, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PackageKind {
    Application,
    Library,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageKind::Application => write!(f, "@application"),
            PackageKind::Library => write!(f, "@library"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: Option<Version>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    pub kind: PackageKind,
    pub name: String,
    pub version: Version,
    pub builtin: bool,
    pub dependencies: HashMap<String, Dependency>,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "nemesis.manifest";

    pub fn parse(source: &str) -> Result<Self, PmError> {
        let mut kind = None;
        let mut name = None;
        let mut version = None;
        let mut builtin = false;
        let mut dependencies = HashMap::new();
        let mut in_dependencies = false;

        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if line == "@application" {
                kind = Some(PackageKind::Application);
                in_dependencies = false;
                continue;
            }
            if line == "@library" {
                kind = Some(PackageKind::Library);
                in_dependencies = false;
                continue;
            }
            if line == "@dependencies" {
                in_dependencies = true;
                continue;
            }

            if in_dependencies {
                let mut parts = line.split_whitespace();
                let dep_name = parts.next().ok_or_else(|| PmError::MalformedManifest {
                    line: line_no,
                    message: "expected `name [version]`".to_string(),
                })?;
                if !is_valid_package_name(dep_name) {
                    return Err(PmError::InvalidPackageName(dep_name.to_string()));
                }
                let dep_version = match parts.next() {
                    Some(v) => Some(Version::parse(v)?),
                    None => None,
                };
                dependencies.insert(
                    dep_name.to_string(),
                    Dependency {
                        name: dep_name.to_string(),
                        version: dep_version,
                    },
                );
                continue;
            }

            let mut parts = line.splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            match key {
                "name" => {
                    if !is_valid_package_name(value) {
                        return Err(PmError::InvalidPackageName(value.to_string()));
                    }
                    name = Some(value.to_string());
                }
                "version" => version = Some(Version::parse(value)?),
                "builtin" => match value {
                    "true" => builtin = true,
                    "false" => builtin = false,
                    other => return Err(PmError::InvalidBoolean(other.to_string())),
                },
                other => {
                    return Err(PmError::MalformedManifest {
                        line: line_no,
                        message: format!("unknown key `{other}`"),
                    })
                }
            }
        }

        let kind = kind.ok_or_else(|| PmError::MalformedManifest {
            line: 0,
            message: "missing `@application` or `@library` section".to_string(),
        })?;
        let name = name.ok_or_else(|| PmError::MalformedManifest {
            line: 0,
            message: "missing `name`".to_string(),
        })?;
        let version = version.ok_or_else(|| PmError::MalformedManifest {
            line: 0,
            message: "missing `version`".to_string(),
        })?;

        Ok(Manifest {
            kind,
            name,
            version,
            builtin,
            dependencies,
        })
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, PmError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "{}\nname {}\nversion {}\nbuiltin {}\n",
            self.kind, self.name, self.version, self.builtin
        );
        if !self.dependencies.is_empty() {
            out.push_str("\n@dependencies\n");
            let mut names: Vec<&String> = self.dependencies.keys().collect();
            names.sort();
            for name in names {
                let dep = &self.dependencies[name];
                match &dep.version {
                    Some(v) => out.push_str(&format!("{name} {v}\n")),
                    None => out.push_str(&format!("{name}\n")),
                }
            }
        }
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PmError> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_application() {
        let manifest = Manifest::parse("@application\nname demo\nversion 0.1.0\n").unwrap();
        assert_eq!(manifest.kind, PackageKind::Application);
        assert_eq!(manifest.name, "demo");
        assert!(!manifest.builtin);
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_parse_with_dependencies() {
        let source = "\
@library
name fancy_math
version 1.4.0
builtin false

@dependencies
core 2.0.0
stringy
";
        let manifest = Manifest::parse(source).unwrap();
        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(
            manifest.dependencies["core"].version,
            Some(Version::parse("2.0.0").unwrap())
        );
        assert_eq!(manifest.dependencies["stringy"].version, None);
    }

    #[test]
    fn test_rejects_invalid_name() {
        let err = Manifest::parse("@application\nname 1bad\nversion 0.1.0\n").unwrap_err();
        assert!(matches!(err, PmError::InvalidPackageName(_)));
    }

    #[test]
    fn test_roundtrip_render_parse() {
        let manifest = Manifest::parse("@library\nname roundtrip\nversion 3.2.1\nbuiltin true\n")
            .unwrap();
        let rendered = manifest.render();
        let reparsed = Manifest::parse(&rendered).unwrap();
        assert_eq!(manifest, reparsed);
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let source = "# top comment\n@application\nname demo\nversion 0.1.0 # inline comment\n\n";
        let manifest = Manifest::parse(source).unwrap();
        assert_eq!(manifest.name, "demo");
    }
}
