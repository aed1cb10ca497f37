use std::sync::Mutex;

use crate::error::{Result, SverError};
use crate::git::VersionControl;

/// Mock repository for testing without actual git operations
///
/// Every query answers from the configured fields and is recorded, so tests
/// can check which queries the resolver issued.
#[derive(Debug)]
pub struct MockRepository {
    available: bool,
    work_tree: bool,
    latest_tag: Option<String>,
    tags_at_head: Vec<String>,
    head_timestamp: i64,
    commit_count: u64,
    short_hash: String,
    dirty: bool,
    queries: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Clean work tree with one untagged commit at 2021-01-01T00:00:00Z
    pub fn new() -> Self {
        MockRepository {
            available: true,
            work_tree: true,
            latest_tag: None,
            tags_at_head: Vec::new(),
            head_timestamp: 1_609_459_200,
            commit_count: 0,
            short_hash: "0123abcd".to_string(),
            dirty: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Simulate a missing tool binary
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Simulate a directory outside any work tree
    pub fn outside_work_tree(mut self) -> Self {
        self.work_tree = false;
        self
    }

    /// Most recent reachable tag, not pointing at HEAD
    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    /// Tag HEAD itself; it also becomes the most recent reachable tag
    pub fn with_tag_at_head(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.latest_tag = Some(tag.clone());
        self.tags_at_head.push(tag);
        self
    }

    pub fn with_head_timestamp(mut self, timestamp: i64) -> Self {
        self.head_timestamp = timestamp;
        self
    }

    pub fn with_commit_count(mut self, count: u64) -> Self {
        self.commit_count = count;
        self
    }

    pub fn with_short_hash(mut self, hash: impl Into<String>) -> Self {
        self.short_hash = hash.into();
        self
    }

    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Names of the queries issued so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn record(&self, query: impl Into<String>) -> Result<()> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.into());
        }
        if !self.available {
            return Err(SverError::ToolNotFound {
                binary: "mock".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockRepository {
    fn verify(&self) -> Result<()> {
        self.record("verify")?;
        if !self.work_tree {
            return Err(SverError::NotAWorkingTree("mock".to_string()));
        }
        Ok(())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        self.record("latest_tag")?;
        Ok(self.latest_tag.clone())
    }

    fn tags_at_head(&self) -> Result<Vec<String>> {
        self.record("tags_at_head")?;
        Ok(self.tags_at_head.clone())
    }

    fn head_timestamp(&self) -> Result<i64> {
        self.record("head_timestamp")?;
        Ok(self.head_timestamp)
    }

    fn commit_count_since(&self, reference: &str) -> Result<u64> {
        self.record(format!("commit_count_since {}", reference))?;
        Ok(self.commit_count)
    }

    fn head_short_hash(&self) -> Result<String> {
        self.record("head_short_hash")?;
        Ok(self.short_hash.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        self.record("is_dirty")?;
        Ok(self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.verify().is_ok());
        assert_eq!(repo.latest_tag().unwrap(), None);
        assert!(repo.tags_at_head().unwrap().is_empty());
        assert!(!repo.is_dirty().unwrap());
    }

    #[test]
    fn test_mock_repository_tag_at_head() {
        let repo = MockRepository::new().with_tag_at_head("v1.0.0");
        assert_eq!(repo.latest_tag().unwrap().as_deref(), Some("v1.0.0"));
        assert_eq!(repo.tags_at_head().unwrap(), vec!["v1.0.0"]);
    }

    #[test]
    fn test_mock_repository_records_queries() {
        let repo = MockRepository::new();
        repo.verify().unwrap();
        repo.commit_count_since("v1.0.0").unwrap();
        assert_eq!(repo.queries(), vec!["verify", "commit_count_since v1.0.0"]);
    }

    #[test]
    fn test_mock_repository_failures() {
        let repo = MockRepository::new().unavailable();
        assert!(matches!(
            repo.verify(),
            Err(SverError::ToolNotFound { .. })
        ));

        let repo = MockRepository::new().outside_work_tree();
        assert!(matches!(repo.verify(), Err(SverError::NotAWorkingTree(_))));
    }
}
