use tracing::{debug, trace};

use crate::domain::grammar::SemverGrammar;
use crate::error::Result;

/// Tag published when the target is newer than everything in the registry
pub const LATEST: &str = "latest";

/// Decides which tags to push for a version given the tags already published
#[derive(Debug, Clone)]
pub struct TagPlanner {
    grammar: SemverGrammar,
}

impl TagPlanner {
    pub fn new(grammar: SemverGrammar) -> Self {
        TagPlanner { grammar }
    }

    /// Compute the tags to publish for `version`.
    ///
    /// The full version always comes first, followed by the `major.minor`
    /// and `major` aliases when nothing at or above the target already owns
    /// that line, and `latest` when the target beats every existing version.
    /// Pre-release versions are never aliased.
    ///
    /// Existing tags that are not semantic versions are ignored.
    pub fn plan(&self, version: &str, existing_tags: &[String]) -> Result<Vec<String>> {
        let parts = self.grammar.decompose(version)?;

        if !parts.is_release() {
            debug!(%version, "pre-release version, publishing full tag only");
            return Ok(vec![version.to_string()]);
        }

        let target = semver::Version::new(parts.major, parts.minor, parts.patch);
        let existing = sorted_versions(existing_tags);

        let mut do_major = true;
        let mut do_minor = true;
        // Only the first existing version at or above the target matters.
        if let Some(next) = existing.iter().find(|v| **v >= target) {
            if next.major == target.major {
                do_major = false;
            }
            if next.minor == target.minor {
                do_minor = false;
            }
        }

        let mut tags = vec![version.to_string()];
        if do_minor {
            tags.push(format!("{}.{}", parts.major, parts.minor));
        }
        if do_major {
            tags.push(parts.major.to_string());
        }

        let is_latest = existing.last().map_or(true, |newest| target > *newest);
        if is_latest {
            tags.push(LATEST.to_string());
        }

        debug!(%version, ?tags, "planned tags");
        Ok(tags)
    }
}

/// Parse registry tags as semantic versions, sorted ascending by precedence
fn sorted_versions(tags: &[String]) -> Vec<semver::Version> {
    let mut versions: Vec<semver::Version> = tags
        .iter()
        .filter_map(|tag| {
            let candidate = tag.strip_prefix('v').unwrap_or(tag);
            match semver::Version::parse(candidate) {
                Ok(v) => Some(v),
                Err(e) => {
                    trace!(%tag, error = %e, "skipping non-semver tag");
                    None
                }
            }
        })
        .collect();

    versions.sort();
    versions
}
