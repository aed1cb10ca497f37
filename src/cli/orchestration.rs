//! Command workflows
//!
//! The root command and the `tags` subcommand, kept apart from argument
//! parsing so they can run against any [VersionControl] and [TagSource].

use tracing::debug;

use crate::domain::TagPlanner;
use crate::error::{Result, SverError};
use crate::git::VersionControl;
use crate::registry::TagSource;
use crate::resolver::{pre_release, ResolveOptions, VersionResolver};

/// Options of the root command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionArgs {
    /// Increment kind (`major`, `minor` or `patch`)
    pub next: Option<String>,

    /// Pre-release identifier appended to the version
    pub pre_release: Option<String>,

    /// Print only `major`
    pub major_only: bool,

    /// Print only `major.minor`
    pub minor_only: bool,

    /// Fail on pre-release or dirty versions
    pub release_only: bool,

    /// Ignore uncommitted changes
    pub force: bool,
}

/// Options of the `tags` subcommand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagsArgs {
    /// Image whose published tags are compared
    pub image: String,

    pub pre_release: Option<String>,

    pub release_only: bool,

    pub force: bool,
}

/// Resolve the version and apply the pre-release identifier
fn resolve_with_pre_release<V: VersionControl>(
    resolver: &VersionResolver<V>,
    identifier: Option<&str>,
    options: ResolveOptions,
) -> Result<String> {
    let identifier = identifier.filter(|id| !id.is_empty());

    if identifier.is_some() && options.release_only {
        return Err(SverError::usage(
            "Asked for a pre-release version, but the --release flag is on.",
        ));
    }

    let version = resolver.resolve(options)?;

    Ok(match identifier {
        Some(id) => pre_release(&version, id),
        None => version,
    })
}

/// Root command: the version to print
///
/// # Returns
/// * `Ok(String)` - Full version, or `major.minor` / `major` when narrowed
/// * `Err` - On resolution failures, conflicting flags, or narrowing a
///   development version
pub fn run_version<V: VersionControl>(
    resolver: &VersionResolver<V>,
    args: &VersionArgs,
) -> Result<String> {
    let options = ResolveOptions {
        release_only: args.release_only,
        force: args.force,
    };
    let mut version = resolve_with_pre_release(resolver, args.pre_release.as_deref(), options)?;

    if let Some(kind) = args.next.as_deref() {
        version = resolver.advance(&version, kind, args.force)?;
    }

    if args.minor_only && args.major_only {
        return Err(SverError::usage(
            "can't use --minor and --major in the same run",
        ));
    }

    if args.minor_only || args.major_only {
        let parts = resolver.grammar().decompose(&version)?;
        let flag = if args.minor_only { "--minor" } else { "--major" };
        if !parts.is_release() {
            return Err(SverError::DevelopmentVersion { version, flag });
        }

        version = if args.minor_only {
            format!("{}.{}", parts.major, parts.minor)
        } else {
            parts.major.to_string()
        };
    }

    debug!(%version, "version output");
    Ok(version)
}

/// `tags` subcommand: the tags to push for the current version
pub fn run_tags<V: VersionControl, S: TagSource>(
    resolver: &VersionResolver<V>,
    registry: &S,
    args: &TagsArgs,
) -> Result<Vec<String>> {
    let options = ResolveOptions {
        release_only: args.release_only,
        force: args.force,
    };
    let version = resolve_with_pre_release(resolver, args.pre_release.as_deref(), options)?;

    let existing = registry.list_tags(&args.image)?;
    debug!(image = %args.image, existing = existing.len(), "existing tags");

    TagPlanner::new(resolver.grammar().clone()).plan(&version, &existing)
}
