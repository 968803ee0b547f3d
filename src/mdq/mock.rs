use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MdqpError, Result};

use super::{store_artifact, SignedMetadataSource};

/// Mock metadata source for testing without a running MDQ service.
///
/// Serves canned documents keyed by hash and records every fetch in order.
/// A hash with no registered document fails the fetch, which is how tests
/// simulate a service outage.
#[derive(Default)]
pub struct MockMdq {
    documents: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl MockMdq {
    pub fn new() -> Self {
        MockMdq::default()
    }

    /// Registers a signed document to serve for `sha1`.
    pub fn add_document(&mut self, sha1: impl Into<String>, xml: impl Into<String>) {
        self.documents.insert(sha1.into(), xml.into());
    }

    /// Hashes fetched so far, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl SignedMetadataSource for MockMdq {
    fn fetch_signed(&self, sha1: &str, dest_dir: &Path) -> Result<PathBuf> {
        self.fetched.borrow_mut().push(sha1.to_string());
        match self.documents.get(sha1) {
            Some(xml) => store_artifact(xml.as_bytes(), sha1, dest_dir),
            None => Err(MdqpError::mdq(format!("no signed document for {sha1}"))),
        }
    }
}
