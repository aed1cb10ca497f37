// Shared fixtures: scratch repositories built with git2, queried through the
// real git binary.
#![allow(dead_code)]

use git2::{Commit, ObjectType, Repository, Signature};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use sver::git::GitCommand;

/// Whether the git binary can be executed at all
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Skip the calling test when git is missing
macro_rules! require_git {
    () => {
        if !common::git_available() {
            eprintln!("git not available, skipping");
            return;
        }
    };
}

pub struct Fixture {
    pub dir: TempDir,
    pub repo: Repository,
}

impl Fixture {
    /// Empty repository without commits
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        Fixture { dir, repo }
    }

    /// Repository with one commit tagged `tag`
    pub fn with_tag(tag: &str) -> Self {
        let fixture = Self::new();
        fixture.commit(tag);
        fixture.tag(tag);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> GitCommand {
        GitCommand::new("git", self.path())
    }

    /// Write `file_name` and commit it on HEAD
    pub fn commit(&self, file_name: &str) {
        fs::write(self.path().join(file_name), "Dummy content").expect("Could not write file");

        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new(file_name))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let sig = Signature::now("Test User", "test@example.com").expect("Could not get sig");

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, "Dummy", &tree, &parents)
            .expect("Could not create commit");
    }

    /// Lightweight tag on HEAD
    pub fn tag(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .expect("Could not resolve HEAD");
        self.repo
            .tag_lightweight(name, &head, false)
            .expect("Could not create tag");
    }

    /// Stage a new file without committing it
    pub fn stage_change(&self) {
        fs::write(self.path().join("tracked_file"), "Dummy content").expect("Could not write file");

        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new("tracked_file"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
    }

    /// Leave a file git does not know about
    pub fn untracked_change(&self) {
        fs::write(self.path().join("some_untracked_file"), "Dummy content")
            .expect("Could not write file");
    }
}
