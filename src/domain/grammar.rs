//! Supported version syntax.
//!
//! Based on <https://semver.org/#semantic-versioning-200>, with two
//! deviations: a leading `v` is accepted, and `+` build metadata
//! (e.g. `1.0.0+gold`) is rejected.

use regex::{Captures, Regex};

use crate::domain::version::{Version, VersionBump};
use crate::error::{Result, SverError};

const SUPPORTED_VERSION_FORMAT: &str = r"^v?(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)((?:-(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*)?)$";

const VERSION_PARTS: &str = r"^([0-9]+)\.([0-9]+)\.([0-9]+)(.*)$";

/// Compiled version grammar
///
/// Owns its patterns so that callers decide when they are compiled; nothing
/// here is process-global.
#[derive(Debug, Clone)]
pub struct SemverGrammar {
    supported: Regex,
    parts: Regex,
}

impl SemverGrammar {
    pub fn new() -> Result<Self> {
        Ok(SemverGrammar {
            supported: Regex::new(SUPPORTED_VERSION_FORMAT)?,
            parts: Regex::new(VERSION_PARTS)?,
        })
    }

    /// Validate `input` against the supported grammar and split it.
    ///
    /// A leading `v` is stripped. Strings carrying `+` build metadata fail
    /// with [`SverError::UnsupportedBuildMetadata`], everything else that does
    /// not match fails with [`SverError::InvalidSemver`].
    pub fn parse(&self, input: &str) -> Result<Version> {
        let Some(caps) = self.supported.captures(input) else {
            if input.contains('+') {
                return Err(SverError::UnsupportedBuildMetadata(input.to_string()));
            }
            return Err(SverError::InvalidSemver(input.to_string()));
        };

        numbered(&caps, input)
    }

    /// Split `input` positionally into major, minor, patch and tail.
    ///
    /// Looser than [`SemverGrammar::parse`]: the tail is taken verbatim, so
    /// resolved pre-release and dirty strings still decompose. No `v` prefix
    /// is accepted here.
    pub fn decompose(&self, input: &str) -> Result<Version> {
        let caps = self
            .parts
            .captures(input)
            .ok_or_else(|| SverError::InvalidSemver(input.to_string()))?;

        numbered(&caps, input)
    }

    /// Increment `version` by `kind` (`patch`, `minor` or `major`).
    ///
    /// The result is always a plain `major.minor.patch`; any tail is dropped.
    pub fn increment(&self, version: &str, kind: &str) -> Result<String> {
        let current = self.decompose(version)?;
        let bump: VersionBump = kind.parse()?;

        Ok(current.bump(bump)?.to_string())
    }
}

fn numbered(caps: &Captures<'_>, input: &str) -> Result<Version> {
    let component = |idx: usize, name: &'static str| -> Result<u64> {
        caps[idx]
            .parse::<u64>()
            .map_err(|_| SverError::ComponentOverflow {
                component: name,
                input: input.to_string(),
            })
    };

    Ok(Version::with_tail(
        component(1, "major")?,
        component(2, "minor")?,
        component(3, "patch")?,
        &caps[4],
    ))
}
