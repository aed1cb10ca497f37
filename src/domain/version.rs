use crate::error::{Result, SverError};
use std::fmt;
use std::str::FromStr;

/// Semantic version split into its numeric components and an opaque tail
///
/// The tail holds everything after the patch number, including the leading
/// `-` of a pre-release marker. It is empty for release versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub tail: String,
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            tail: String::new(),
        }
    }

    /// Create a version carrying a tail (e.g. `-alpha.1`)
    pub fn with_tail(major: u64, minor: u64, patch: u64, tail: impl Into<String>) -> Self {
        Version {
            major,
            minor,
            patch,
            tail: tail.into(),
        }
    }

    /// True when there is no pre-release or dirty suffix
    pub fn is_release(&self) -> bool {
        self.tail.is_empty()
    }

    /// Bump version according to bump type; the tail is always dropped
    ///
    /// # Returns
    /// * `Err(SverError::ComponentOverflow)` - The bumped component is
    ///   already `u64::MAX`
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let next = |value: u64, component: &'static str| {
            value
                .checked_add(1)
                .ok_or_else(|| SverError::ComponentOverflow {
                    component,
                    input: self.to_string(),
                })
        };

        Ok(match bump_type {
            VersionBump::Major => Version::new(next(self.major, "major")?, 0, 0),
            VersionBump::Minor => Version::new(self.major, next(self.minor, "minor")?, 0),
            VersionBump::Patch => {
                Version::new(self.major, self.minor, next(self.patch, "patch")?)
            }
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, self.tail)
    }
}

/// Version bump type requested with `--next`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl FromStr for VersionBump {
    type Err = SverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(SverError::InvalidIncrementKind(other.to_string())),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
