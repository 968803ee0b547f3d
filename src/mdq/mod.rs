//! Fetching signed metadata from an MDQ service.
//!
//! The MDQ protocol addresses an entity as
//! `{base}/entities/%7Bsha1%7D<hex>`, where `%7Bsha1%7D` is the URL-encoded
//! `{sha1}` transform selector. Artifacts keep that literal prefix in their
//! file names so the signed directory can be served as a document root
//! without any rewriting.

pub mod client;
pub mod mock;

pub use client::MdqClient;
pub use mock::MockMdq;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{MdqpError, Result};

/// URL-encoded form of the `{sha1}` transform selector.
pub const SHA1_SELECTOR: &str = "%7Bsha1%7D";

/// File name of the signed artifact for an entityID hash.
pub fn artifact_name(sha1: &str) -> String {
    format!("{SHA1_SELECTOR}{sha1}")
}

/// Source of signed metadata documents, keyed by the hex SHA-1 of an
/// entityID.
///
/// Implementations: [`MdqClient`] talking to a real MDQ service, and
/// [`MockMdq`] for tests.
pub trait SignedMetadataSource {
    /// Fetches the signed document for `sha1` and stores it in `dest_dir`.
    ///
    /// The document is validated before it is stored and the store is
    /// atomic, so the published directory never holds a partial or invalid
    /// artifact.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the stored artifact
    /// * `Err` - Request failed or the response was not valid metadata
    fn fetch_signed(&self, sha1: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// Writes a validated document next to its final location, then renames it
/// into place. The temp file lives in `dest_dir` so the rename stays on one
/// filesystem.
pub(crate) fn store_artifact(body: &[u8], sha1: &str, dest_dir: &Path) -> Result<PathBuf> {
    let mut tmp = NamedTempFile::new_in(dest_dir)?;
    tmp.write_all(body)?;
    let target = dest_dir.join(artifact_name(sha1));
    tmp.persist(&target).map_err(|e| MdqpError::Io(e.error))?;
    Ok(target)
}
