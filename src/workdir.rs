//! Layout of the sync working directory under `BASEDIR`.
//!
//! Directory names match what the surrounding deployment expects: the
//! aggregator drops files into `incoming_metadata/` and the web server
//! publishes `signed_metadata/` as the MDQ document root.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Marker file recording that an initial full sync has completed.
const FULL_SYNC_MARKER: &str = "full_sync";

/// Resolves paths inside the sync working directory.
#[derive(Debug, Clone)]
pub struct Workdir {
    base: PathBuf,
}

impl Workdir {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Workdir { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Unsigned metadata dropped off by the upstream aggregator.
    pub fn incoming(&self) -> PathBuf {
        self.base.join("incoming_metadata")
    }

    /// Copies of incoming files as they looked when last queued.
    pub fn seen(&self) -> PathBuf {
        self.base.join("seen_metadata")
    }

    /// Signed per-entity documents, laid out for the MDQ web root.
    pub fn signed_entities(&self) -> PathBuf {
        self.base.join("signed_metadata").join("entities")
    }

    pub fn queue_dir(&self) -> PathBuf {
        self.base.join("queue")
    }

    /// Backlog queue filled by bootstrap runs.
    pub fn daily_queue(&self) -> PathBuf {
        self.queue_dir().join("daily.db")
    }

    /// Priority queue for new and modified entities.
    pub fn delta_queue(&self) -> PathBuf {
        self.queue_dir().join("delta.db")
    }

    pub fn full_sync_marker(&self) -> PathBuf {
        self.base.join(FULL_SYNC_MARKER)
    }

    /// Prepares the directory tree for a run.
    ///
    /// Returns `true` when this is a bootstrap run: the full-sync marker is
    /// missing, so any leftover queues are dropped and every incoming entity
    /// must be treated as unprocessed. The marker is created immediately;
    /// a run that dies halfway resumes from its queues instead of starting
    /// over.
    pub fn prepare(&self) -> Result<bool> {
        let marker = self.full_sync_marker();
        let bootstrap = !marker.exists();

        if bootstrap {
            if self.queue_dir().exists() {
                fs::remove_dir_all(self.queue_dir())?;
            }
            fs::create_dir_all(&self.base)?;
            File::create(&marker)?;
        }

        for dir in [
            self.incoming(),
            self.seen(),
            self.signed_entities(),
            self.queue_dir(),
        ] {
            fs::create_dir_all(dir)?;
        }

        Ok(bootstrap)
    }
}
