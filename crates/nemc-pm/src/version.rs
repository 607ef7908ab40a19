//! Package version: `major.minor.patch`, no leading zeros, no pre-release or
//! build metadata. `semver`'s richer grammar would silently accept inputs
//! this grammar rejects, so versions are parsed and compared by hand.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PmError;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$").unwrap());

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn parse(value: &str) -> Result<Self, PmError> {
        if !VERSION_RE.is_match(value) {
            return Err(PmError::InvalidVersion(value.to_string()));
        }
        let mut parts = value.split('.');
        let major = parts.next().unwrap().parse().unwrap();
        let minor = parts.next().unwrap().parse().unwrap();
        let patch = parts.next().unwrap().parse().unwrap();
        Ok(Version { major, minor, patch })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

pub fn is_valid_package_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn is_valid_hash_value(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version { major: 1, minor: 2, patch: 3 });
    }

    #[test]
    fn test_rejects_leading_zero() {
        assert!(Version::parse("01.2.3").is_err());
        assert!(Version::parse("1.02.3").is_err());
    }

    #[test]
    fn test_rejects_prerelease_suffix() {
        assert!(Version::parse("1.2.3-beta").is_err());
    }

    #[test]
    fn test_ordering() {
        let a = Version::parse("1.2.3").unwrap();
        let b = Version::parse("1.10.0").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_package_name_validation() {
        assert!(is_valid_package_name("my_lib"));
        assert!(is_valid_package_name("_private"));
        assert!(!is_valid_package_name("1bad"));
        assert!(!is_valid_package_name("has-dash"));
    }
}
