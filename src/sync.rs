//! The metadata sync pipeline.
//!
//! Each run scans the incoming directory for new and changed entity
//! metadata, queues the changes, prunes entities the upstream aggregator
//! removed and then downloads signed documents for a slice of the queued
//! backlog. The slice is sized so a day's worth of runs works through the
//! whole backlog without hammering the MDQ service.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::SyncSettings;
use crate::error::Result;
use crate::mdq::{artifact_name, SignedMetadataSource};
use crate::metadata;
use crate::queue::{PersistentQueue, QueuedEntity};
use crate::workdir::Workdir;

/// Counters describing what one run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Entities queued because this was a bootstrap run.
    pub bootstrapped: usize,
    /// Entities queued because their file was not seen before.
    pub added: usize,
    /// Entities queued because their file content changed.
    pub modified: usize,
    /// Entities whose incoming file disappeared; artifacts cleaned up.
    pub removed: usize,
    /// Incoming files skipped because they were not parseable metadata.
    pub unparseable: usize,
    /// Signed documents downloaded this run.
    pub fetched: usize,
    /// Queued entities skipped because their file vanished before download.
    pub vanished: usize,
    /// Messages still queued when the run finished.
    pub remaining: usize,
}

/// One run of the sync pipeline.
///
/// `hour` is the local hour of day (0-23); together with the runs-per-hour
/// setting it determines how much of the backlog this run takes on.
pub struct SyncPipeline<'a, S: SignedMetadataSource> {
    dirs: Workdir,
    source: &'a S,
    runs_per_hour: u32,
    min_entities_per_run: usize,
    hour: u32,
}

impl<'a, S: SignedMetadataSource> SyncPipeline<'a, S> {
    pub fn new(dirs: Workdir, source: &'a S, settings: &SyncSettings, hour: u32) -> Self {
        SyncPipeline {
            dirs,
            source,
            runs_per_hour: settings.runs_per_hour,
            min_entities_per_run: settings.min_entities_per_run,
            hour,
        }
    }

    /// Executes a full run: scan, prune, then drain a budgeted slice of the
    /// queues.
    pub fn run(&self) -> Result<SyncOutcome> {
        let bootstrap = self.dirs.prepare()?;
        let daily = PersistentQueue::open(&self.dirs.daily_queue())?;
        let delta = PersistentQueue::open(&self.dirs.delta_queue())?;

        let mut outcome = SyncOutcome::default();
        self.scan_incoming(bootstrap, &daily, &delta, &mut outcome)?;
        self.sweep_removed(&mut outcome)?;

        let total = daily.len()? + delta.len()?;
        info!("total queue: {total}");
        if total == 0 {
            info!("no updates to fetch");
            return Ok(outcome);
        }

        let left = runs_left(self.hour, self.runs_per_hour);
        info!("runs left today: {left}");
        let budget = fetch_budget(total, left, self.min_entities_per_run);
        info!("updates to process this run: {budget}");

        self.drain(&delta, &daily, budget, &mut outcome)?;
        outcome.remaining = daily.len()? + delta.len()?;
        Ok(outcome)
    }

    /// Queues incoming entities that are new, changed, or not yet processed
    /// at all (bootstrap). Whatever gets queued is also copied to the seen
    /// directory so the next run can tell changed from unchanged.
    fn scan_incoming(
        &self,
        bootstrap: bool,
        daily: &PersistentQueue,
        delta: &PersistentQueue,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        for path in sorted_files(&self.dirs.incoming())? {
            let Some(name) = file_name(&path) else {
                continue;
            };

            let entity_id = match metadata::entity_id_from_file(&path) {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping {name}: {e}");
                    outcome.unparseable += 1;
                    continue;
                }
            };
            let message = QueuedEntity {
                file: name.clone(),
                sha1: metadata::sha1_hex(&entity_id),
                entity_id,
            };
            let seen_path = self.dirs.seen().join(&name);

            if bootstrap {
                info!("bootstrap of {name}");
                daily.push(&message)?;
                fs::copy(&path, &seen_path)?;
                outcome.bootstrapped += 1;
            } else if !seen_path.is_file() {
                info!("new file {name}");
                delta.push(&message)?;
                fs::copy(&path, &seen_path)?;
                outcome.added += 1;
            } else if metadata::file_sha1(&path)? != metadata::file_sha1(&seen_path)? {
                info!("modified file {name}");
                delta.push(&message)?;
                fs::copy(&path, &seen_path)?;
                outcome.modified += 1;
            }
        }
        Ok(())
    }

    /// Removes seen copies and signed artifacts for entities whose incoming
    /// file is gone.
    fn sweep_removed(&self, outcome: &mut SyncOutcome) -> Result<()> {
        for path in sorted_files(&self.dirs.seen())? {
            let Some(name) = file_name(&path) else {
                continue;
            };
            if self.dirs.incoming().join(&name).exists() {
                continue;
            }

            match metadata::entity_id_from_file(&path) {
                Ok(entity_id) => {
                    let sha1 = metadata::sha1_hex(&entity_id);
                    info!("removed file {name}: {sha1}");
                    fs::remove_file(&path)?;
                    let artifact = self.dirs.signed_entities().join(artifact_name(&sha1));
                    if artifact.exists() {
                        fs::remove_file(artifact)?;
                    }
                }
                Err(e) => {
                    // Without an entityID there is no artifact name to clean up.
                    warn!("removing {name} without artifact cleanup: {e}");
                    fs::remove_file(&path)?;
                }
            }
            outcome.removed += 1;
        }
        Ok(())
    }

    /// Processes up to `budget` queued messages, delta queue first.
    ///
    /// A message is acknowledged only after its download succeeded, so an
    /// aborted run redelivers it. Messages whose incoming file is gone are
    /// acknowledged without a fetch; the removal sweep already cleaned up
    /// after them.
    fn drain(
        &self,
        delta: &PersistentQueue,
        daily: &PersistentQueue,
        budget: usize,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        let signed_dir = self.dirs.signed_entities();
        for _ in 0..budget {
            let (label, queue) = if !delta.is_empty()? {
                ("delta", delta)
            } else if !daily.is_empty()? {
                ("daily", daily)
            } else {
                info!("queues are empty");
                break;
            };

            let Some(claimed) = queue.front()? else {
                break;
            };
            let QueuedEntity {
                file,
                entity_id,
                sha1,
            } = &claimed.entity;
            info!("working on {label} queue message: {entity_id} - {sha1}");

            if self.dirs.incoming().join(file).exists() {
                self.source.fetch_signed(sha1, &signed_dir)?;
                outcome.fetched += 1;
            } else {
                info!("{file} no longer in incoming, probably removed upstream");
                outcome.vanished += 1;
            }
            queue.ack(claimed.id)?;
        }
        Ok(())
    }
}

/// Scheduled runs remaining today, counting this one.
pub fn runs_left(hour: u32, runs_per_hour: u32) -> u32 {
    (23 - hour.min(23)) * runs_per_hour + 1
}

/// Messages to process this run: the backlog spread over the remaining runs
/// today, plus one so the backlog shrinks even when the division rounds to
/// zero, plus the configured floor.
pub fn fetch_budget(total: usize, runs_left: u32, min_entities: usize) -> usize {
    total / runs_left as usize + 1 + min_entities
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_left_counts_current_run() {
        // Last hour of the day: only this run is left.
        assert_eq!(runs_left(23, 6), 1);
        assert_eq!(runs_left(0, 6), 139);
        assert_eq!(runs_left(12, 1), 12);
    }

    #[test]
    fn test_fetch_budget_spreads_backlog() {
        assert_eq!(fetch_budget(1000, 100, 0), 11);
        // Rounds down, the +1 keeps the queue draining.
        assert_eq!(fetch_budget(5, 24, 0), 1);
        assert_eq!(fetch_budget(0, 24, 0), 1);
    }

    #[test]
    fn test_fetch_budget_applies_floor() {
        assert_eq!(fetch_budget(5, 24, 50), 51);
    }
}
