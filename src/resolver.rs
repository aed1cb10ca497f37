//! Version resolution from repository state.
//!
//! The version starts as the most recent reachable tag and is then adjusted:
//! an untagged HEAD gets a `-<timestamp>.<commits>.g<hash>` pre-release
//! suffix, and uncommitted changes append `-dirty`.

use chrono::DateTime;
use tracing::debug;

use crate::domain::SemverGrammar;
use crate::error::{Result, SverError};
use crate::git::VersionControl;

/// Version assumed when the history has no tag at all
pub const INITIAL_VERSION: &str = "0.0.0";

/// Suffix appended for uncommitted changes
pub const DIRTY_SUFFIX: &str = "-dirty";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Switches for [VersionResolver::resolve]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Fail instead of producing a pre-release or dirty version
    pub release_only: bool,
    /// Ignore uncommitted changes
    pub force: bool,
}

/// Computes the version of the current checkout
pub struct VersionResolver<V: VersionControl> {
    vcs: V,
    grammar: SemverGrammar,
}

impl<V: VersionControl> VersionResolver<V> {
    pub fn new(vcs: V, grammar: SemverGrammar) -> Self {
        VersionResolver { vcs, grammar }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn grammar(&self) -> &SemverGrammar {
        &self.grammar
    }

    /// Resolve the version string for the checkout.
    ///
    /// # Returns
    /// * `Ok(String)` - `1.2.3` on a clean tagged HEAD, otherwise a
    ///   pre-release and/or `-dirty` variant of the last tag
    /// * `Err` - If the tool is missing, the last tag is not a supported
    ///   version, or `release_only` is set and the version is not a release
    pub fn resolve(&self, options: ResolveOptions) -> Result<String> {
        self.vcs.verify()?;

        let (tag, has_tag) = match self.vcs.latest_tag()? {
            Some(tag) => (tag, true),
            None => (INITIAL_VERSION.to_string(), false),
        };
        debug!(%tag, has_tag, "base tag");

        self.grammar.parse(&tag)?;

        let mut version = tag;

        if self.vcs.tags_at_head()?.is_empty() {
            if options.release_only {
                return Err(SverError::NotAReleaseVersion);
            }
            version = format!("{}-{}", version, self.pre_release_suffix(&version, has_tag)?);
        }

        if !options.force && self.vcs.is_dirty()? {
            if options.release_only {
                return Err(SverError::DirtyRelease);
            }
            version.push_str(DIRTY_SUFFIX);
        }

        let version = match version.strip_prefix('v') {
            Some(stripped) => stripped.to_string(),
            None => version,
        };
        debug!(%version, "resolved version");

        Ok(version)
    }

    /// Increment `version` by `kind`, keeping the dirty marker.
    ///
    /// Unless `force` is set, `-dirty` is re-appended when the working tree
    /// has uncommitted changes, since the increment itself drops any tail.
    pub fn advance(&self, version: &str, kind: &str, force: bool) -> Result<String> {
        let mut next = self.grammar.increment(version, kind)?;

        if !force && self.vcs.is_dirty()? {
            next.push_str(DIRTY_SUFFIX);
        }

        Ok(next)
    }

    /// `<timestamp>.<commits>.g<hash>` for HEAD
    fn pre_release_suffix(&self, tag: &str, has_tag: bool) -> Result<String> {
        let seconds = self.vcs.head_timestamp()?;
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| SverError::UnexpectedOutput {
                query: "commit timestamp",
                output: seconds.to_string(),
            })?
            .format(TIMESTAMP_FORMAT);

        let commits = if has_tag {
            self.vcs.commit_count_since(tag)?
        } else {
            0
        };

        let hash = self.vcs.head_short_hash()?;

        Ok(format!("{}.{}.g{}", timestamp, commits, hash))
    }
}

/// Append a pre-release identifier to `version`.
///
/// No validation is done, and a dirty version keeps its marker first:
/// `1.0.0-dirty` becomes `1.0.0-dirty-<identifier>`.
pub fn pre_release(version: &str, identifier: &str) -> String {
    format!("{}-{}", version, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn resolver(repo: MockRepository) -> VersionResolver<MockRepository> {
        VersionResolver::new(repo, SemverGrammar::new().unwrap())
    }

    #[test]
    fn test_tag_at_head_is_release() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2"));
        assert_eq!(r.resolve(ResolveOptions::default()).unwrap(), "1.0.2");
    }

    #[test]
    fn test_tag_at_head_without_prefix() {
        let r = resolver(MockRepository::new().with_tag_at_head("1.0.2"));
        assert_eq!(r.resolve(ResolveOptions::default()).unwrap(), "1.0.2");
    }

    #[test]
    fn test_no_tags_uses_initial_version() {
        let r = resolver(
            MockRepository::new()
                .with_head_timestamp(1_700_000_000)
                .with_short_hash("deadbeef"),
        );
        let version = r.resolve(ResolveOptions::default()).unwrap();
        assert_eq!(version, "0.0.0-20231114221320.0.gdeadbeef");
    }

    #[test]
    fn test_no_tags_skips_commit_count() {
        let r = resolver(MockRepository::new());
        r.resolve(ResolveOptions::default()).unwrap();
        assert!(!r
            .vcs()
            .queries()
            .iter()
            .any(|q| q.starts_with("commit_count_since")));
    }

    #[test]
    fn test_commits_since_tag() {
        let r = resolver(
            MockRepository::new()
                .with_latest_tag("v1.0.2")
                .with_commit_count(3)
                .with_head_timestamp(0)
                .with_short_hash("0badc0de"),
        );
        let version = r.resolve(ResolveOptions::default()).unwrap();
        assert_eq!(version, "1.0.2-19700101000000.3.g0badc0de");
        assert!(r
            .vcs()
            .queries()
            .contains(&"commit_count_since v1.0.2".to_string()));
    }

    #[test]
    fn test_prerelease_tag_keeps_its_tail() {
        let r = resolver(
            MockRepository::new()
                .with_latest_tag("v2.4.0-alpha.foo")
                .with_commit_count(1)
                .with_head_timestamp(0),
        );
        let version = r.resolve(ResolveOptions::default()).unwrap();
        assert_eq!(version, "2.4.0-alpha.foo-19700101000000.1.g0123abcd");
    }

    #[test]
    fn test_dirty_release() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2").dirty());
        assert_eq!(r.resolve(ResolveOptions::default()).unwrap(), "1.0.2-dirty");
    }

    #[test]
    fn test_dirty_prerelease() {
        let r = resolver(
            MockRepository::new()
                .with_latest_tag("v1.0.2")
                .with_commit_count(1)
                .with_head_timestamp(0)
                .dirty(),
        );
        let version = r.resolve(ResolveOptions::default()).unwrap();
        assert_eq!(version, "1.0.2-19700101000000.1.g0123abcd-dirty");
    }

    #[test]
    fn test_force_ignores_dirty_tree() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2").dirty());
        let options = ResolveOptions {
            force: true,
            ..Default::default()
        };
        assert_eq!(r.resolve(options).unwrap(), "1.0.2");
        assert!(!r.vcs().queries().contains(&"is_dirty".to_string()));
    }

    #[test]
    fn test_release_only_on_clean_tag() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2"));
        let options = ResolveOptions {
            release_only: true,
            force: false,
        };
        assert_eq!(r.resolve(options).unwrap(), "1.0.2");
    }

    #[test]
    fn test_release_only_off_tag() {
        let r = resolver(MockRepository::new().with_latest_tag("v1.0.2").dirty());
        let options = ResolveOptions {
            release_only: true,
            force: false,
        };
        assert!(matches!(
            r.resolve(options),
            Err(SverError::NotAReleaseVersion)
        ));
    }

    #[test]
    fn test_release_only_dirty() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2").dirty());
        let options = ResolveOptions {
            release_only: true,
            force: false,
        };
        assert!(matches!(r.resolve(options), Err(SverError::DirtyRelease)));
    }

    #[test]
    fn test_release_only_dirty_with_force() {
        let r = resolver(MockRepository::new().with_tag_at_head("v1.0.2").dirty());
        let options = ResolveOptions {
            release_only: true,
            force: true,
        };
        assert_eq!(r.resolve(options).unwrap(), "1.0.2");
    }

    #[test]
    fn test_invalid_tag() {
        let r = resolver(MockRepository::new().with_tag_at_head("some_tag"));
        let err = r.resolve(ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, SverError::InvalidSemver(ref t) if t == "some_tag"));
    }

    #[test]
    fn test_build_metadata_tag() {
        let r = resolver(MockRepository::new().with_tag_at_head("1.0.2+gold"));
        let err = r.resolve(ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, SverError::UnsupportedBuildMetadata(_)));
    }

    #[test]
    fn test_preflight_failures() {
        let r = resolver(MockRepository::new().unavailable());
        assert!(matches!(
            r.resolve(ResolveOptions::default()),
            Err(SverError::ToolNotFound { .. })
        ));

        let r = resolver(MockRepository::new().outside_work_tree());
        assert!(matches!(
            r.resolve(ResolveOptions::default()),
            Err(SverError::NotAWorkingTree(_))
        ));
    }

    #[test]
    fn test_pre_release() {
        assert_eq!(pre_release("10.200.5", "nightly"), "10.200.5-nightly");
        assert_eq!(
            pre_release("10.200.5-dirty", "nightly"),
            "10.200.5-dirty-nightly"
        );
    }

    #[test]
    fn test_advance() {
        let r = resolver(MockRepository::new());
        assert_eq!(r.advance("10.200.5", "patch", false).unwrap(), "10.200.6");
        assert_eq!(r.advance("10.200.5", "minor", false).unwrap(), "10.201.0");
        assert_eq!(r.advance("10.200.5", "major", false).unwrap(), "11.0.0");
    }

    #[test]
    fn test_advance_keeps_dirty_marker() {
        let r = resolver(MockRepository::new().dirty());
        assert_eq!(
            r.advance("10.200.5-dirty", "patch", false).unwrap(),
            "10.200.6-dirty"
        );
        assert_eq!(r.advance("10.200.5-dirty", "patch", true).unwrap(), "10.200.6");
    }
}
