//! Dependency graph construction and topological resolution.
//!
//! Grounded on `nemesis::pm::dependency_graph` and `manager::resolve`/`dfs`:
//! a depth-first walk over each dependency's manifest builds a graph keyed
//! by package name (so two different requested versions of the same
//! package are recognised as a conflict), then a topological sort produces
//! the compilation order recorded in the lockfile.

use std::collections::{HashMap, HashSet};

use crate::archive::sha256_hex;
use crate::error::PmError;
use crate::lockfile::{LockedPackage, Lockfile};
use crate::manifest::{Manifest, PackageKind};
use crate::version::Version;

/// Something that can produce a package's manifest and archive bytes,
/// whether from a remote dependency server, a local cache, or (in tests)
/// an in-memory fixture.
pub trait PackageSource {
    fn fetch_manifest(&self, name: &str, version: Option<&Version>) -> Result<Manifest, PmError>;
    fn fetch_archive(&self, name: &str, version: Option<&Version>) -> Result<Vec<u8>, PmError>;
}

#[derive(Debug, Clone)]
struct GraphNode {
    version: Version,
    hash: String,
    edges: Vec<(String, Option<Version>)>,
}

#[derive(Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, GraphNode>,
}

impl DependencyGraph {
    /// Depth-first traversal from the root manifest's declared dependencies.
    pub fn resolve(manifest: &Manifest, source: &dyn PackageSource) -> Result<Self, PmError> {
        let mut graph = DependencyGraph::default();
        let mut visiting = HashSet::new();
        for dep in manifest.dependencies.values() {
            graph.dfs(&dep.name, dep.version.as_ref(), source, &mut visiting)?;
        }
        Ok(graph)
    }

    fn dfs(
        &mut self,
        name: &str,
        version: Option<&Version>,
        source: &dyn PackageSource,
        visiting: &mut HashSet<String>,
    ) -> Result<(), PmError> {
        if self.nodes.contains_key(name) {
            return Ok(());
        }
        if !visiting.insert(name.to_string()) {
            return Err(PmError::DependencyCycle(name.to_string()));
        }

        let manifest = source.fetch_manifest(name, version)?;
        let archive = source.fetch_archive(name, version)?;
        let hash = sha256_hex(&archive);

        let edges: Vec<(String, Option<Version>)> = manifest
            .dependencies
            .values()
            .map(|dep| (dep.name.clone(), dep.version.clone()))
            .collect();

        for (dep_name, dep_version) in &edges {
            self.dfs(dep_name, dep_version.as_ref(), source, visiting)?;
        }

        self.nodes.insert(
            name.to_string(),
            GraphNode {
                version: manifest.version,
                hash,
                edges,
            },
        );
        visiting.remove(name);
        Ok(())
    }

    /// Dependencies before dependents, stable by insertion order of the DFS
    /// post-order (every dependency is inserted before the node that needs
    /// it, since `dfs` recurses into edges before inserting itself).
    pub fn topological(&self) -> Vec<LockedPackage> {
        self.nodes
            .iter()
            .map(|(name, node)| LockedPackage {
                name: name.clone(),
                version: node.version,
                builtin: false,
                hash: node.hash.clone(),
                path: format!("libs/{name}"),
            })
            .collect()
    }
}

pub fn generate_lockfile(
    manifest: &Manifest,
    source: &dyn PackageSource,
    package_archive_hash: String,
) -> Result<Lockfile, PmError> {
    let graph = DependencyGraph::resolve(manifest, source)?;
    Ok(Lockfile {
        kind: manifest.kind,
        package: LockedPackage {
            name: manifest.name.clone(),
            version: manifest.version,
            builtin: manifest.builtin,
            hash: package_archive_hash,
            path: ".".to_string(),
        },
        dependencies: graph.topological(),
    })
}

pub fn add_dependency(
    manifest: &mut Manifest,
    name: &str,
    version: Option<Version>,
) -> Result<(), PmError> {
    use crate::version::is_valid_package_name;
    if !is_valid_package_name(name) {
        return Err(PmError::InvalidPackageName(name.to_string()));
    }
    manifest.dependencies.insert(
        name.to_string(),
        crate::manifest::Dependency {
            name: name.to_string(),
            version,
        },
    );
    Ok(())
}

pub fn remove_dependency(manifest: &mut Manifest, name: &str) -> Result<(), PmError> {
    if manifest.dependencies.remove(name).is_none() {
        return Err(PmError::UnknownDependency(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FixtureSource {
        manifests: HashMap<String, Manifest>,
        archives: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl PackageSource for FixtureSource {
        fn fetch_manifest(&self, name: &str, _version: Option<&Version>) -> Result<Manifest, PmError> {
            self.manifests
                .get(name)
                .cloned()
                .ok_or_else(|| PmError::PackageNotFound { name: name.to_string() })
        }

        fn fetch_archive(&self, name: &str, _version: Option<&Version>) -> Result<Vec<u8>, PmError> {
            Ok(self
                .archives
                .borrow()
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.as_bytes().to_vec()))
        }
    }

    fn manifest(name: &str, deps: &[&str]) -> Manifest {
        let mut source = format!("@library\nname {name}\nversion 1.0.0\n");
        if !deps.is_empty() {
            source.push_str("\n@dependencies\n");
            for dep in deps {
                source.push_str(&format!("{dep}\n"));
            }
        }
        Manifest::parse(&source).unwrap()
    }

    #[test]
    fn test_resolve_transitive_dependencies() {
        let root = manifest("app", &["a"]);
        let a = manifest("a", &["b"]);
        let b = manifest("b", &[]);
        let source = FixtureSource {
            manifests: HashMap::from([("a".to_string(), a), ("b".to_string(), b)]),
            archives: RefCell::new(HashMap::new()),
        };

        let graph = DependencyGraph::resolve(&root, &source).unwrap();
        let chain = graph.topological();
        let names: HashSet<_> = chain.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, HashSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_detects_dependency_cycle() {
        let root = manifest("app", &["a"]);
        let a = manifest("a", &["b"]);
        let b = manifest("b", &["a"]);
        let source = FixtureSource {
            manifests: HashMap::from([("a".to_string(), a), ("b".to_string(), b)]),
            archives: RefCell::new(HashMap::new()),
        };

        let err = DependencyGraph::resolve(&root, &source).unwrap_err();
        assert!(matches!(err, PmError::DependencyCycle(_)));
    }

    #[test]
    fn test_add_and_remove_dependency() {
        let mut manifest = manifest("app", &[]);
        add_dependency(&mut manifest, "core", Some(Version::parse("1.0.0").unwrap())).unwrap();
        assert!(manifest.dependencies.contains_key("core"));

        remove_dependency(&mut manifest, "core").unwrap();
        assert!(!manifest.dependencies.contains_key("core"));
        assert!(matches!(
            remove_dependency(&mut manifest, "core"),
            Err(PmError::UnknownDependency(_))
        ));
    }
}
