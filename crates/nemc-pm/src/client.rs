//! Blocking HTTP client for the dependency server.
//!
//! `GET /download/{name}[?version=]` returns the package archive bytes,
//! `GET /checksum/{name}[?version=]` returns the expected SHA-256 hex
//! digest. Any non-200 response is fatal, mirroring the original
//! `manager::download_package` behaviour. `reqwest` has no precedent
//! elsewhere in the pack for this exact role but is the standard real
//! crate for a blocking HTTP client.

use crate::archive::read_manifest;
use crate::error::PmError;
use crate::manifest::Manifest;
use crate::resolver::PackageSource;
use crate::version::Version;

pub struct DependencyClient {
    base_url: String,
    agent: reqwest::blocking::Client,
}

impl DependencyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        DependencyClient {
            base_url: base_url.into(),
            agent: reqwest::blocking::Client::new(),
        }
    }

    fn request(&self, path: &str, name: &str, version: Option<&Version>) -> Result<reqwest::blocking::Response, PmError> {
        let mut url = format!("{}{}/{}", self.base_url, path, name);
        if let Some(version) = version {
            url.push_str(&format!("?version={version}"));
        }
        let response = self.agent.get(&url).send()?;
        if !response.status().is_success() {
            return Err(PmError::PackageNotFound {
                name: name.to_string(),
            });
        }
        Ok(response)
    }

    pub fn download_archive(&self, name: &str, version: Option<&Version>) -> Result<Vec<u8>, PmError> {
        let response = self.request("/download", name, version)?;
        Ok(response.bytes()?.to_vec())
    }

    pub fn fetch_checksum(&self, name: &str, version: Option<&Version>) -> Result<String, PmError> {
        let response = self.request("/checksum", name, version)?;
        Ok(response.text()?.trim().to_string())
    }
}

impl PackageSource for DependencyClient {
    fn fetch_manifest(&self, name: &str, version: Option<&Version>) -> Result<Manifest, PmError> {
        let archive = self.download_archive(name, version)?;
        read_manifest(&archive, name)
    }

    fn fetch_archive(&self, name: &str, version: Option<&Version>) -> Result<Vec<u8>, PmError> {
        self.download_archive(name, version)
    }
}
