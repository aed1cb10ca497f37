//! Version-control query abstraction
//!
//! Version resolution only needs a handful of read-only facts about the
//! checkout. They are gathered behind the [VersionControl] trait so the
//! resolver can run against a real `git` binary or an in-memory fake.
//!
//! # Implementations
//!
//! - [command::GitCommand]: shells out to the `git` CLI
//! - [mock::MockRepository]: scripted answers for tests
//!
//! ```rust
//! # use sver::git::{MockRepository, VersionControl};
//! let repo = MockRepository::new().with_latest_tag("v1.0.0");
//! assert_eq!(repo.latest_tag().unwrap().as_deref(), Some("v1.0.0"));
//! ```

pub mod command;
pub mod mock;

pub use command::GitCommand;
pub use mock::MockRepository;

use crate::error::Result;

/// Read-only queries about the current checkout
///
/// ## Error Handling
///
/// Every query is fatal on failure; implementations never retry. The only
/// "not found" condition that is not an error is a history without any
/// reachable tag, reported as `Ok(None)` by [VersionControl::latest_tag].
pub trait VersionControl: Send + Sync {
    /// Check that the tool is available and the directory is a working tree
    ///
    /// # Returns
    /// * `Err(SverError::ToolNotFound)` - The tool cannot be executed
    /// * `Err(SverError::NotAWorkingTree)` - The directory is not checked out
    fn verify(&self) -> Result<()>;

    /// Most recent tag reachable from HEAD, or `None` when there is none
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Tags pointing exactly at HEAD
    fn tags_at_head(&self) -> Result<Vec<String>>;

    /// Commit timestamp of HEAD in Unix epoch seconds
    fn head_timestamp(&self) -> Result<i64>;

    /// Number of commits between `reference` and HEAD
    fn commit_count_since(&self, reference: &str) -> Result<u64>;

    /// Abbreviated (8 character) hash of HEAD, without any prefix
    fn head_short_hash(&self) -> Result<String>;

    /// Whether the working tree has uncommitted changes
    ///
    /// Staged, unstaged and untracked changes all count.
    fn is_dirty(&self) -> Result<bool>;
}
