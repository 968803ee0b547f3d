use crate::error::Result;
use git2::{ObjectType, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn tags_containing(&self, commit: &str) -> Result<Vec<String>> {
        let target = self.repo.revparse_single(commit)?.peel_to_commit()?.id();

        let mut tags = Vec::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{name}")) {
                Ok(reference) => reference,
                Err(_) => continue,
            };
            // Peel through annotated tag objects to the tagged commit.
            let Ok(object) = reference.peel(ObjectType::Commit) else {
                continue;
            };

            let tagged = object.id();
            if tagged == target || self.repo.graph_descendant_of(tagged, target)? {
                tags.push(name.to_string());
            }
        }

        Ok(tags)
    }
}
