//! Git operations abstraction layer
//!
//! The release flow only needs a read-only view of the repository: which
//! tags contain the commit being released. The [Repository] trait keeps
//! that seam mockable; concrete implementations are
//! [repository::Git2Repository] backed by the `git2` crate and
//! [mock::MockRepository] for testing.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-only view of the git state the release flow needs.
///
/// Code should depend on this trait rather than a concrete implementation
/// so version resolution stays testable without a real repository.
pub trait Repository {
    /// Get all tag names whose history contains `commit`
    ///
    /// A tag contains the commit when the tagged commit is the commit
    /// itself or one of its descendants, matching `git tag --contains`.
    ///
    /// # Arguments
    /// * `commit` - A commit-ish: full or abbreviated hash, or a ref name
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names, unordered
    /// * `Err` - If the commit cannot be resolved or a Git error occurs
    ///
    /// # Example
    /// ```rust
    /// # use mdqp::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
    /// let tags = repo.tags_containing("HEAD")?;
    /// for tag in tags {
    ///     println!("contained in: {}", tag);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn tags_containing(&self, commit: &str) -> Result<Vec<String>>;
}
