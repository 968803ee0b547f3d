use crate::error::Result;
use crate::git::Repository;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags_by_commit: HashMap<String, Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags_by_commit: HashMap::new(),
        }
    }

    /// Register a tag whose history contains the given commit
    pub fn add_tag_containing(&mut self, commit: impl Into<String>, tag: impl Into<String>) {
        self.tags_by_commit
            .entry(commit.into())
            .or_default()
            .push(tag.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tags_containing(&self, commit: &str) -> Result<Vec<String>> {
        Ok(self
            .tags_by_commit
            .get(commit)
            .cloned()
            .unwrap_or_default())
    }
}
