pub mod archive;
pub mod client;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod resolver;
pub mod version;

pub use client::DependencyClient;
pub use error::PmError;
pub use lockfile::{LockedPackage, Lockfile};
pub use manifest::{Dependency, Manifest, PackageKind};
pub use resolver::{DependencyGraph, PackageSource};
pub use version::Version;
