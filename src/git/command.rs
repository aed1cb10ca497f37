use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Result, SverError};
use crate::git::VersionControl;

/// Binary used when nothing else is configured
pub const DEFAULT_GIT_BINARY: &str = "git";

/// Marker in `git describe` output when no tag is reachable
const NO_TAG_MARKER: &str = "cannot describe anything";

/// [VersionControl] backed by the `git` command line tool
#[derive(Debug, Clone)]
pub struct GitCommand {
    binary: String,
    workdir: PathBuf,
}

impl GitCommand {
    /// Run `binary` inside `workdir`
    pub fn new(binary: impl Into<String>, workdir: impl AsRef<Path>) -> Self {
        GitCommand {
            binary: binary.into(),
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    /// Default `git` binary in the current directory
    pub fn current_dir() -> Self {
        Self::new(DEFAULT_GIT_BINARY, ".")
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn spawn(&self, args: &[&str]) -> Result<Output> {
        // A missing workdir also surfaces as NotFound from the spawn.
        if !self.workdir.is_dir() {
            return Err(SverError::NotAWorkingTree(format!(
                "'{}' is not a directory",
                self.workdir.display()
            )));
        }

        debug!(binary = %self.binary, ?args, workdir = ?self.workdir, "running git");

        Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SverError::ToolNotFound {
                    binary: self.binary.clone(),
                },
                _ => SverError::Io(e),
            })
    }

    /// Run a query and return its trimmed stdout
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.spawn(args)?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(SverError::Command {
                command: format!("{} {}", self.binary, args.join(" ")),
                output: combined.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VersionControl for GitCommand {
    fn verify(&self) -> Result<()> {
        let output = self.spawn(&["rev-parse", "--is-inside-work-tree"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SverError::NotAWorkingTree(stderr.trim().to_string()));
        }
        if stdout.trim() != "true" {
            return Err(SverError::NotAWorkingTree(format!(
                "'{}' is not inside a work tree",
                self.workdir.display()
            )));
        }

        Ok(())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        match self.run(&["describe", "--tags", "--abbrev=0"]) {
            Ok(tag) => Ok(Some(tag)),
            Err(SverError::Command { output, .. }) if output.contains(NO_TAG_MARKER) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn tags_at_head(&self) -> Result<Vec<String>> {
        let out = self.run(&["tag", "--points-at", "HEAD"])?;

        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn head_timestamp(&self) -> Result<i64> {
        let out = self.run(&["show", "--no-patch", "--format=%ct", "HEAD"])?;

        out.parse().map_err(|_| SverError::UnexpectedOutput {
            query: "commit timestamp",
            output: out,
        })
    }

    fn commit_count_since(&self, reference: &str) -> Result<u64> {
        let range = format!("{}...HEAD", reference);
        let out = self.run(&["rev-list", "--count", &range])?;

        out.parse().map_err(|_| SverError::UnexpectedOutput {
            query: "commit count",
            output: out,
        })
    }

    fn head_short_hash(&self) -> Result<String> {
        self.run(&["rev-parse", "--short=8", "HEAD"])
    }

    fn is_dirty(&self) -> Result<bool> {
        let status = self.run(&["status", "--short"])?;
        Ok(!status.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let git = GitCommand::new("thisbinarydoesnotexist", ".");
        let err = git.verify().unwrap_err();
        assert!(
            matches!(err, SverError::ToolNotFound { ref binary } if binary == "thisbinarydoesnotexist")
        );
    }

    #[test]
    fn test_missing_binary_fails_every_query() {
        let git = GitCommand::new("thisbinarydoesnotexist", ".");
        assert!(matches!(
            git.latest_tag(),
            Err(SverError::ToolNotFound { .. })
        ));
        assert!(matches!(git.is_dirty(), Err(SverError::ToolNotFound { .. })));
    }

    #[test]
    fn test_missing_workdir_is_not_a_work_tree() {
        let git = GitCommand::new("git", "/definitely/not/here/sver");
        let err = git.verify().unwrap_err();
        assert!(
            matches!(err, SverError::NotAWorkingTree(ref detail) if detail.contains("/definitely/not/here/sver"))
        );
        assert!(matches!(
            git.latest_tag(),
            Err(SverError::NotAWorkingTree(_))
        ));
    }

    #[test]
    fn test_current_dir_defaults() {
        let git = GitCommand::current_dir();
        assert_eq!(git.binary(), "git");
    }
}
