use thiserror::Error;

#[derive(Debug, Error)]
pub enum PmError {
    #[error("invalid package name `{0}`")]
    InvalidPackageName(String),
    #[error("invalid package version `{0}`")]
    InvalidVersion(String),
    #[error("invalid boolean value `{0}`")]
    InvalidBoolean(String),
    #[error("invalid hash value `{0}`")]
    InvalidHash(String),
    #[error("malformed manifest at line {line}: {message}")]
    MalformedManifest { line: usize, message: String },
    #[error("malformed lockfile at line {line}: {message}")]
    MalformedLockfile { line: usize, message: String },
    #[error("dependency cycle detected involving `{0}`")]
    DependencyCycle(String),
    #[error("package `{name}` not found on dependency server")]
    PackageNotFound { name: String },
    #[error("dependency `{0}` is not declared in the manifest")]
    UnknownDependency(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
